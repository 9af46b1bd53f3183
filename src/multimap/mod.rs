use std::marker::PhantomData;
use std::slice;

use thiserror::Error;

use crate::schema::{Identity, Schema, Violation};
use crate::seal::{Seal, Sealed};

// simple ordered multi-map: a flat entry sequence, duplicate keys allowed,
// lookups are linear scans
pub struct MultiMap<V, S = Identity> {
    entries: Vec<Entry<V>>,
    seal: Seal,
    _schema: PhantomData<S>,
}

struct Entry<V> {
    key: String,
    value: V,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The schema rejected a supplied key or value.
    #[error(transparent)]
    Violation(#[from] Violation),
    /// A mutating operation ran after make_immutable().
    #[error(transparent)]
    Immutable(#[from] Sealed),
    /// get() found no entry for the key.
    #[error("no entry for key {0:?}")]
    MissingKey(String),
}

impl<V, S: Schema<V>> MultiMap<V, S> {
    pub fn new() -> MultiMap<V, S> {
        MultiMap {
            entries: Vec::new(),
            seal: Seal::new(),
            _schema: PhantomData,
        }
    }

    /// Build a container seeded from (key, value) pairs.
    ///
    /// Pairs run through the append algorithm in iteration order, so every
    /// seeded key and value is validated. The first rejection aborts
    /// construction and no instance is produced.
    pub fn from_pairs<I, K>(pairs: I) -> Result<MultiMap<V, S>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let mut map = MultiMap::new();

        for (key, value) in pairs {
            map.append(key, value)?;
        }

        Ok(map)
    }

    /// Append one entry to the end of the sequence. Never deduplicates.
    ///
    /// The key is validated first, then the value. Returns the container for
    /// chaining with `?`.
    pub fn append<K: Into<String>>(&mut self, key: K, value: V) -> Result<&mut Self, Error> {
        self.seal.ensure_unlocked()?;

        let key = S::check_key(key.into())?;
        let value = S::check_value(value)?;
        self.entries.push(Entry { key, value });

        Ok(self)
    }

    /// Replace all entries for the key with a single entry.
    ///
    /// Equivalent to delete-then-append: the surviving entry sits at the end
    /// of the sequence, not at the position of any entry it replaced. The key
    /// and value are validated once.
    pub fn set<K: Into<String>>(&mut self, key: K, value: V) -> Result<&mut Self, Error> {
        self.seal.ensure_unlocked()?;

        let key = S::check_key(key.into())?;
        let value = S::check_value(value)?;

        self.entries.retain(|entry| entry.key != key);
        self.entries.push(Entry { key, value });

        Ok(self)
    }

    /// Remove all entries. No validation runs (nothing is supplied).
    pub fn clear(&mut self) -> Result<(), Error> {
        self.seal.ensure_unlocked()?;
        self.entries.clear();

        Ok(())
    }

    /// Stable sort by key, ascending code-point order.
    ///
    /// Entries with equal keys keep their relative order.
    pub fn sort(&mut self) -> Result<&mut Self, Error> {
        self.seal.ensure_unlocked()?;
        self.entries.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(self)
    }

    /// Return the value of the first entry matching the key.
    ///
    /// If no entry matches, return Err(MissingKey).
    pub fn get(&self, key: &str) -> Result<&V, Error> {
        let key = S::check_key(key.to_string())?;

        for entry in &self.entries {
            if entry.key == key {
                return Ok(&entry.value);
            }
        }

        Err(Error::MissingKey(key))
    }

    /// Like get(), but Ok(None) when no entry matches.
    pub fn get_optional(&self, key: &str) -> Result<Option<&V>, Error> {
        let key = S::check_key(key.to_string())?;

        Ok(self
            .entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value))
    }

    /// Return all values for the key, in sequence order.
    ///
    /// An empty vec (not an error) when none match.
    pub fn get_all(&self, key: &str) -> Result<Vec<&V>, Error> {
        let key = S::check_key(key.to_string())?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key == key)
            .map(|entry| &entry.value)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn entries(&self) -> Entries<'_, V> {
        Entries(self.entries.iter())
    }

    /// Invoke the callback once per entry in sequence order.
    ///
    /// The callback receives (value, key), value first.
    pub fn for_each<F: FnMut(&V, &str)>(&self, mut f: F) {
        for entry in &self.entries {
            f(&entry.value, &entry.key);
        }
    }

    /// Lock the container permanently. Idempotent; there is no unlock.
    pub fn make_immutable(&mut self) -> &mut Self {
        self.seal.lock();
        self
    }

    pub fn immutable(&self) -> bool {
        self.seal.is_locked()
    }
}

impl<V: PartialEq, S: Schema<V>> MultiMap<V, S> {
    /// Remove every entry matching the key, and the value too if a filter is
    /// given. None means "no value filter"; Some(v) filters on any real
    /// value, so a Some holding an empty or zero value still filters.
    ///
    /// Relative order of the remaining entries is preserved. Returns the
    /// number removed (0 if none matched).
    pub fn delete(&mut self, key: &str, value: Option<V>) -> Result<usize, Error> {
        self.seal.ensure_unlocked()?;

        let key = S::check_key(key.to_string())?;
        let filter = match value {
            Some(value) => Some(S::check_value(value)?),
            None => None,
        };

        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry.key != key || filter.as_ref().map_or(false, |v| entry.value != *v)
        });

        Ok(before - self.entries.len())
    }

    /// True if at least one entry matches the key, and the value too if a
    /// filter is given. The filter follows the same absence rules as
    /// delete().
    pub fn has(&self, key: &str, value: Option<V>) -> Result<bool, Error> {
        let key = S::check_key(key.to_string())?;
        let filter = match value {
            Some(value) => Some(S::check_value(value)?),
            None => None,
        };

        Ok(self.entries.iter().any(|entry| {
            entry.key == key && filter.as_ref().map_or(true, |v| entry.value == *v)
        }))
    }
}

impl<V, S: Schema<V>> Default for MultiMap<V, S> {
    fn default() -> Self {
        MultiMap::new()
    }
}

/// Borrowing iterator over (key, value) pairs in sequence order.
pub struct Entries<'a, V>(slice::Iter<'a, Entry<V>>);

impl<'a, V> Iterator for Entries<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| (entry.key.as_str(), &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

// default iteration is entries()
impl<'a, V, S: Schema<V>> IntoIterator for &'a MultiMap<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Entries<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}
