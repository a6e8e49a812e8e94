//! Error types.
//!
//! Three failure sources exist and each has its own type:
//!
//! - [`ConfigError`]: the cache could not be constructed.
//! - [`KeyError`]: the call arguments could not be turned into a lookup key.
//! - The wrapped computation's own error, carried unchanged inside
//!   [`MemoError::Compute`].
//!
//! None of them leave the cache in a modified state.

extern crate alloc;

use alloc::string::String;
use thiserror::Error;

/// Rejected cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A bounded capacity must hold at least one entry.
    #[error("cache capacity must be a positive integer, got {0}")]
    NonPositiveCapacity(i64),
}

/// The call arguments could not be normalized into a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// An argument value has no stable equality, so it cannot be looked up.
    #[error("argument `{path}` is not hashable: {reason}")]
    Unhashable {
        /// Location of the offending value, e.g. `args[1]` or `kwargs.rate[0]`.
        path: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A named argument was supplied twice, or re-binds a parameter that was
    /// already given positionally.
    #[error("argument `{name}` was supplied more than once")]
    DuplicateArgument {
        /// Name of the repeated argument.
        name: String,
    },
}

/// Failure of [`MemoCache::get_or_compute`](crate::MemoCache::get_or_compute).
#[derive(Debug, Error)]
pub enum MemoError<E> {
    /// The arguments could not be used as a cache key.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The wrapped computation failed. Nothing was cached.
    #[error(transparent)]
    Compute(E),
}

impl<E> MemoError<E> {
    /// Returns the computation error, if that is what this is.
    pub fn into_compute(self) -> Option<E> {
        match self {
            MemoError::Compute(err) => Some(err),
            MemoError::Key(_) => None,
        }
    }

    /// Returns the key error, if that is what this is.
    pub fn as_key_error(&self) -> Option<&KeyError> {
        match self {
            MemoError::Key(err) => Some(err),
            MemoError::Compute(_) => None,
        }
    }
}
