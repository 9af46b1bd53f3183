use thiserror::Error;

/// Key/value validation bound to a container type.
///
/// A schema fixes both validators at the type level: `MultiMap<V, A>` and
/// `MultiMap<V, B>` are unrelated types even if `A` and `B` validate the same
/// way. Both functions are pure and may normalize their input before
/// accepting it.
pub trait Schema<V> {
    /// Validate a key before it is stored or compared.
    ///
    /// If accepted, return Ok(key), possibly normalized.
    /// If rejected, return Err(violation) to abort the whole operation.
    fn check_key(key: String) -> Result<String, Violation>;

    /// Validate a value before it is stored or compared.
    ///
    /// If accepted, return Ok(value), possibly normalized.
    /// If rejected, return Err(violation) to abort the whole operation.
    fn check_value(value: V) -> Result<V, Violation>;
}

/// Rejection raised by a schema, carried to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Violation(String);

impl Violation {
    pub fn new<R: Into<String>>(reason: R) -> Self {
        Violation(reason.into())
    }
}

/// Schema accepting every key and value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<V> Schema<V> for Identity {
    fn check_key(key: String) -> Result<String, Violation> {
        Ok(key)
    }

    fn check_value(value: V) -> Result<V, Violation> {
        Ok(value)
    }
}
