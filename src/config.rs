//! Cache Configuration Module
//!
//! Configuration for [`MemoCache`](crate::MemoCache). Like the rest of the
//! crate's configs, [`MemoCacheConfig`] has all public fields so it can be
//! written out as a struct literal:
//!
//! ```
//! use memo_cache::config::{Capacity, MemoCacheConfig};
//! use memo_cache::KeyPolicy;
//!
//! let config = MemoCacheConfig {
//!     capacity: Capacity::try_from(128usize).unwrap(),
//!     key_policy: KeyPolicy::Distinct,
//!     label: "exchange_rate",
//! };
//! assert_eq!(config.capacity.limit(), Some(128));
//! ```
//!
//! # Capacity
//!
//! [`Capacity`] is either `Bounded` by a non-zero entry count, in which case the
//! least recently used entry is evicted when a new key would exceed it, or
//! `Unbounded`, in which case nothing is ever evicted and the cache is a pure
//! memoizer. Unbounded has to be asked for by name; a zero or negative count is
//! rejected with [`ConfigError::NonPositiveCapacity`] instead of silently
//! producing a cache that never stores anything.

use crate::error::ConfigError;
use crate::key::KeyPolicy;
use core::fmt;
use core::num::NonZeroUsize;

/// Maximum number of entries a cache may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// At most this many entries; the least recently used one is evicted first.
    Bounded(NonZeroUsize),
    /// No limit. Entries live as long as the cache does.
    Unbounded,
}

impl Capacity {
    /// Builds a bounded capacity, rejecting zero.
    pub fn bounded(limit: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(limit)
            .map(Capacity::Bounded)
            .ok_or(ConfigError::NonPositiveCapacity(0))
    }

    /// Maps an optional limit to a capacity: `None` is `Unbounded`.
    pub fn from_limit(limit: Option<usize>) -> Result<Self, ConfigError> {
        match limit {
            Some(limit) => Capacity::bounded(limit),
            None => Ok(Capacity::Unbounded),
        }
    }

    /// The entry limit, or `None` when unbounded.
    #[inline]
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Bounded(n) => Some(n.get()),
            Capacity::Unbounded => None,
        }
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        matches!(self, Capacity::Bounded(_))
    }

    /// Returns true when `len` entries exceed this capacity.
    #[inline]
    pub(crate) fn is_exceeded_by(&self, len: usize) -> bool {
        match self {
            Capacity::Bounded(n) => len > n.get(),
            Capacity::Unbounded => false,
        }
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(limit: NonZeroUsize) -> Self {
        Capacity::Bounded(limit)
    }
}

impl TryFrom<usize> for Capacity {
    type Error = ConfigError;

    fn try_from(limit: usize) -> Result<Self, Self::Error> {
        Capacity::bounded(limit)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = ConfigError;

    fn try_from(limit: i64) -> Result<Self, Self::Error> {
        if limit <= 0 {
            return Err(ConfigError::NonPositiveCapacity(limit));
        }
        usize::try_from(limit)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Capacity::Bounded)
            .ok_or(ConfigError::NonPositiveCapacity(limit))
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Bounded(n) => write!(f, "{}", n),
            Capacity::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Configuration for a [`MemoCache`](crate::MemoCache).
///
/// # Fields
///
/// - `capacity`: entry limit, see [`Capacity`].
/// - `key_policy`: whether named arguments may be folded into positional
///   slots when building keys from [`CallArgs`](crate::CallArgs). Typed
///   argument tuples ignore it.
/// - `label`: name attached to the cache's log events.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MemoCacheConfig {
    /// Maximum number of memoized results.
    pub capacity: Capacity,
    /// Rule for normalizing dynamic call arguments into keys.
    pub key_policy: KeyPolicy,
    /// Name used in `tracing` events emitted by the cache.
    pub label: &'static str,
}

impl Default for MemoCacheConfig {
    fn default() -> Self {
        MemoCacheConfig {
            capacity: Capacity::Unbounded,
            key_policy: KeyPolicy::Distinct,
            label: "memo",
        }
    }
}

impl fmt::Debug for MemoCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCacheConfig")
            .field("capacity", &self.capacity)
            .field("key_policy", &self.key_policy)
            .field("label", &self.label)
            .finish()
    }
}
