#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Typed arguments
//!
//! Any hashable argument type (integers, `String`, tuples of them) is its own
//! cache key:
//!
//! ```rust
//! use memo_cache::{infallible, Capacity, MemoCache};
//! use core::num::NonZeroUsize;
//!
//! let mut add = MemoCache::new(
//!     infallible(|&(a, b): &(i32, i32)| a + b),
//!     Capacity::Bounded(NonZeroUsize::new(2).unwrap()),
//! );
//! assert_eq!(add.get_or_compute(&(1, 2)).unwrap(), 3);
//! assert_eq!(add.get_or_compute(&(3, 4)).unwrap(), 7);
//! assert_eq!(add.get_or_compute(&(5, 6)).unwrap(), 11); // (1, 2) evicted
//! assert!(!add.contains(&(1, 2)));
//! ```
//!
//! ## Dynamic arguments
//!
//! Calls with positional and named arguments use [`CallArgs`], usually built
//! with [`call_args!`]:
//!
//! ```rust
//! use memo_cache::{call_args, new_cache, ArgValue, CallArgs};
//! use core::convert::Infallible;
//!
//! let mut sum_many = new_cache(
//!     |args: &CallArgs| {
//!         let total = args
//!             .positional()
//!             .iter()
//!             .chain(args.named_args().iter().map(|(_, v)| v))
//!             .map(|v| match v {
//!                 ArgValue::Int(i) => *i,
//!                 _ => 0,
//!             })
//!             .sum::<i64>();
//!         Ok::<_, Infallible>(total)
//!     },
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(sum_many.get_or_compute(&call_args![1, 2; c = 3, d = 4]).unwrap(), 10);
//! assert_eq!(sum_many.size(), 1);
//! ```
//!
//! ## Failures are not cached
//!
//! ```rust
//! use memo_cache::{MemoCache, Capacity, MemoError};
//!
//! let mut parse = MemoCache::new(
//!     |s: &String| s.parse::<u32>(),
//!     Capacity::Unbounded,
//! );
//! assert!(matches!(
//!     parse.get_or_compute(&"x".to_string()),
//!     Err(MemoError::Compute(_))
//! ));
//! assert_eq!(parse.size(), 0);
//! ```
//!
//! ## Modules
//!
//! - [`memo`]: the memoizing cache
//! - [`key`]: argument values, call arguments and key normalization
//! - [`store`]: LRU and reference entry stores
//! - [`config`]: capacity and cache configuration
//! - [`error`]: error types
//! - [`metrics`]: hit/miss/eviction counters
//! - [`concurrent`]: lock-protected cache for shared use (requires `concurrent` feature)

#![no_std]

#[cfg(any(test, feature = "std", not(feature = "hashbrown")))]
extern crate std;

extern crate alloc;

/// Cache configuration: [`Capacity`](config::Capacity) and
/// [`MemoCacheConfig`](config::MemoCacheConfig).
pub mod config;

/// Error types for construction, key building and computation failures.
pub mod error;

/// Argument values, call arguments and their normalization into keys.
pub mod key;

/// Doubly linked recency list backing the LRU store.
///
/// Internal infrastructure built on raw pointers; not part of the public API.
pub(crate) mod list;

/// Entry stores: the O(1) [`LruStore`](store::LruStore) and the
/// linear-scan [`LedgerStore`](store::LedgerStore) reference.
pub mod store;

/// The memoizing cache.
pub mod memo;

/// Cache metrics.
pub mod metrics;

/// Thread-safe memoizing cache.
///
/// One lock covers lookup, computation, insertion and eviction, so concurrent
/// callers missing on the same key compute it once.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use config::{Capacity, MemoCacheConfig};
pub use error::{ConfigError, KeyError, MemoError};
pub use key::{ArgValue, ArgsKey, CallArgs, KeyPolicy, MemoArgs};
pub use memo::{infallible, new_cache, LedgerMemoCache, MemoCache};
pub use metrics::{CacheMetrics, MemoMetrics};
pub use store::{LedgerStore, LruStore, Store};

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentMemoCache;
