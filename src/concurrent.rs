//! Concurrent Memoizing Cache
//!
//! [`ConcurrentMemoCache`] shares one [`MemoCache`] between threads behind a
//! single `parking_lot::Mutex`. The lock is held across the whole call:
//!
//! ```text
//!   lock ─▶ build key ─▶ lookup ─┬─ hit ──────────────────────────▶ unlock
//!                                └─ miss ─▶ compute ─▶ insert/evict ─▶ unlock
//! ```
//!
//! Holding it through the computation means two callers that miss on the same
//! key never both invoke the computation, and recency order can never be torn
//! between a lookup and the matching insert. The cost is that computations of
//! different keys are serialized too.
//!
//! Memoization caches must update recency on every read, so a read/write lock
//! would buy nothing over a mutex.
//!
//! Callers that need distinct keys to compute in parallel want per-key
//! in-flight markers instead; that is not provided here.
//!
//! # Example
//!
//! ```rust
//! use memo_cache::{infallible, Capacity, ConcurrentMemoCache};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentMemoCache::new(
//!     infallible(|n: &u64| (1..=*n).product::<u64>()),
//!     Capacity::Unbounded,
//! ));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || cache.get_or_compute(&10).unwrap())
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), 3_628_800);
//! }
//! assert_eq!(cache.stats().misses, 1);
//! ```

extern crate alloc;

use crate::config::{Capacity, MemoCacheConfig};
use crate::error::MemoError;
use crate::key::MemoArgs;
use crate::memo::MemoCache;
use crate::metrics::{CacheMetrics, MemoMetrics};
use crate::store::{LruStore, Store};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use parking_lot::Mutex;

/// A [`MemoCache`] that can be shared between threads.
pub struct ConcurrentMemoCache<A: MemoArgs, V, F, S = LruStore<<A as MemoArgs>::Key, V>> {
    inner: Mutex<MemoCache<A, V, F, S>>,
}

impl<A: MemoArgs, V: Clone, F> ConcurrentMemoCache<A, V, F> {
    /// Creates a shared LRU cache with the default key policy and label.
    pub fn new<E>(compute: F, capacity: Capacity) -> Self
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        Self::from_cache(MemoCache::new(compute, capacity))
    }

    /// Creates a shared LRU cache from a full configuration.
    pub fn init<E>(config: MemoCacheConfig, compute: F) -> Self
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        Self::from_cache(MemoCache::init(config, compute))
    }
}

impl<A, V, F, S> ConcurrentMemoCache<A, V, F, S>
where
    A: MemoArgs,
    V: Clone,
    S: Store<A::Key, V>,
{
    /// Wraps an existing cache, keeping its entries and counters.
    pub fn from_cache(cache: MemoCache<A, V, F, S>) -> Self {
        ConcurrentMemoCache {
            inner: Mutex::new(cache),
        }
    }

    /// Same contract as [`MemoCache::get_or_compute`], with the whole call
    /// running under the cache lock.
    pub fn get_or_compute<E>(&self, args: &A) -> Result<V, MemoError<E>>
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        self.inner.lock().get_or_compute(args)
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns true if a result for `args` is held. Does not affect recency.
    pub fn contains(&self, args: &A) -> bool {
        self.inner.lock().contains(args)
    }

    pub fn capacity(&self) -> Capacity {
        self.inner.lock().capacity()
    }

    /// A snapshot of the hit, miss and eviction counters.
    pub fn stats(&self) -> MemoMetrics {
        *self.inner.lock().stats()
    }

    /// Unwraps the inner single-threaded cache.
    pub fn into_inner(self) -> MemoCache<A, V, F, S> {
        self.inner.into_inner()
    }
}

impl<A, V, F, S> CacheMetrics for ConcurrentMemoCache<A, V, F, S>
where
    A: MemoArgs,
    V: Clone,
    S: Store<A::Key, V>,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.inner.lock().algorithm_name()
    }
}

impl<A: MemoArgs, V, F, S> fmt::Debug for ConcurrentMemoCache<A, V, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMemoCache").finish_non_exhaustive()
    }
}
