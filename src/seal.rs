use thiserror::Error;

/// One-way write latch. Once locked it never unlocks.
///
/// This is a cooperative guard against accidental mutation, not a
/// synchronization primitive.
#[derive(Debug, Clone, Default)]
pub struct Seal {
    locked: bool,
}

/// Raised when a mutating operation runs behind a locked seal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("container is immutable")]
pub struct Sealed;

impl Seal {
    pub fn new() -> Self {
        Seal { locked: false }
    }

    /// Lock permanently. Calling again is a no-op.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// If unlocked, return Ok(()).
    ///
    /// If locked, return Err(Sealed). Mutating operations call this before
    /// validating arguments or touching any state.
    pub fn ensure_unlocked(&self) -> Result<(), Sealed> {
        if self.locked {
            Err(Sealed)
        } else {
            Ok(())
        }
    }
}
