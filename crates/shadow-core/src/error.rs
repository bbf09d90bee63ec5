//! Error types for shadow tracking
//!
//! Every tracking-API failure is local and surfaced synchronously to the
//! caller. Nothing is retried internally.

/// Result alias used throughout the crate
pub type Result<T, E = ShadowError> = std::result::Result<T, E>;

/// Errors raised by shadow handles, the copy engine and the schema registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShadowError {
    /// Tracking API reached through a value that is not a shadow handle
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Key was never captured in the baseline, or names no known member
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Runtime type of a value does not match the member it was offered to
    #[error("type mismatch on '{member}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Member (or value) the mismatch was found on
        member: String,
        /// Type the member holds
        expected: &'static str,
        /// Type that was offered
        actual: &'static str,
    },

    /// Positional access outside the sequence
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Length of the sequence
        len: usize,
    },

    /// Strict insert of a key that is already present
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Configuration text could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl ShadowError {
    /// Build a [`ShadowError::KeyNotFound`] from any debuggable key
    #[inline]
    pub fn key_not_found(key: &impl std::fmt::Debug) -> Self {
        Self::KeyNotFound(format!("{key:?}"))
    }

    /// Check if this is a missing-key failure
    #[inline]
    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// Check if this is a type mismatch
    #[inline]
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
