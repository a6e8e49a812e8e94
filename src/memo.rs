//! Memoizing Cache
//!
//! [`MemoCache`] wraps a deterministic computation and answers repeated calls
//! with the result computed the first time the same arguments were seen.
//!
//! # Algorithm
//!
//! For each call to [`get_or_compute`](MemoCache::get_or_compute):
//!
//! 1. Normalize the arguments into a key. Arguments that cannot be keyed are
//!    rejected and nothing else happens.
//! 2. **Hit**: the key is stored. It becomes the most recently used entry and
//!    a clone of its value is returned. The computation is not invoked.
//! 3. **Miss**: the computation is invoked. If it fails the error is returned
//!    as is and the cache is left untouched, so the next call with the same
//!    arguments tries again.
//! 4. The result is stored as the most recently used entry. If the cache is
//!    bounded and now holds one entry too many, the least recently used entry
//!    is evicted.
//!
//! A key always maps to the value computed the first time it was seen. There
//! is no invalidation; an entry only disappears through eviction or when the
//! cache is dropped.
//!
//! # Example
//!
//! ```
//! use memo_cache::{infallible, Capacity, MemoCache};
//! use core::num::NonZeroUsize;
//!
//! let mut multiply = MemoCache::new(
//!     infallible(|&(a, b): &(i64, i64)| a * b),
//!     Capacity::Bounded(NonZeroUsize::new(3).unwrap()),
//! );
//!
//! assert_eq!(multiply.get_or_compute(&(3, 4)).unwrap(), 12);
//! assert_eq!(multiply.get_or_compute(&(3, 4)).unwrap(), 12);
//! assert_eq!(multiply.stats().misses, 1);
//! assert_eq!(multiply.stats().hits, 1);
//! ```
//!
//! # Thread Safety
//!
//! `get_or_compute` takes `&mut self`. To share a cache between threads use
//! `ConcurrentMemoCache` (feature `concurrent`), which runs lookup, computation,
//! insertion and eviction under one lock.

extern crate alloc;

use crate::config::{Capacity, MemoCacheConfig};
use crate::error::{ConfigError, MemoError};
use crate::key::{KeyPolicy, MemoArgs};
use crate::metrics::{CacheMetrics, MemoMetrics};
use crate::store::{LedgerStore, LruStore, Store};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::convert::Infallible;
use core::fmt;
use core::marker::PhantomData;
use tracing::{debug, trace};

/// Memoizing cache around the computation `F`, keyed by arguments `A`.
///
/// `S` is the entry store. The default [`LruStore`] keeps every operation
/// O(1); [`LedgerMemoCache`] swaps in the linear-scan reference store.
pub struct MemoCache<A: MemoArgs, V, F, S = LruStore<<A as MemoArgs>::Key, V>> {
    compute: F,
    store: S,
    key_policy: KeyPolicy,
    label: &'static str,
    metrics: MemoMetrics,
    _marker: PhantomData<fn(&A) -> V>,
}

/// A [`MemoCache`] backed by the O(n)-eviction [`LedgerStore`].
pub type LedgerMemoCache<A, V, F> = MemoCache<A, V, F, LedgerStore<<A as MemoArgs>::Key, V>>;

/// Adapts a computation that cannot fail to the shape `MemoCache` expects.
///
/// ```
/// use memo_cache::{infallible, new_cache};
///
/// let mut square = new_cache(infallible(|x: &u64| x * x), None).unwrap();
/// assert_eq!(square.get_or_compute(&9).unwrap(), 81);
/// ```
pub fn infallible<A: ?Sized, V>(
    mut compute: impl FnMut(&A) -> V,
) -> impl FnMut(&A) -> Result<V, Infallible> {
    move |args| Ok(compute(args))
}

/// Builds an LRU memoizing cache.
///
/// `capacity` of `None` gives an unbounded cache; `Some(0)` is rejected.
pub fn new_cache<A, V, E, F>(
    compute: F,
    capacity: Option<usize>,
) -> Result<MemoCache<A, V, F>, ConfigError>
where
    A: MemoArgs,
    V: Clone,
    F: FnMut(&A) -> Result<V, E>,
{
    let capacity = Capacity::from_limit(capacity)?;
    Ok(MemoCache::new(compute, capacity))
}

impl<A: MemoArgs, V: Clone, F> MemoCache<A, V, F> {
    /// Creates an LRU cache with the default key policy and label.
    pub fn new<E>(compute: F, capacity: Capacity) -> Self
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        Self::with_store(
            MemoCacheConfig {
                capacity,
                ..MemoCacheConfig::default()
            },
            compute,
        )
    }

    /// Creates an LRU cache from a full configuration.
    pub fn init<E>(config: MemoCacheConfig, compute: F) -> Self
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        Self::with_store(config, compute)
    }
}

impl<A, V, F, S> MemoCache<A, V, F, S>
where
    A: MemoArgs,
    V: Clone,
    S: Store<A::Key, V>,
{
    /// Creates a cache over any [`Store`] implementation.
    pub fn with_store<E>(config: MemoCacheConfig, compute: F) -> Self
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        MemoCache {
            compute,
            store: S::with_capacity(config.capacity),
            key_policy: config.key_policy,
            label: config.label,
            metrics: MemoMetrics::default(),
            _marker: PhantomData,
        }
    }

    /// Returns the memoized result for `args`, computing and storing it on a miss.
    ///
    /// Errors from the computation come back as [`MemoError::Compute`] and are
    /// never cached. Arguments that cannot be keyed come back as
    /// [`MemoError::Key`] without invoking the computation.
    pub fn get_or_compute<E>(&mut self, args: &A) -> Result<V, MemoError<E>>
    where
        F: FnMut(&A) -> Result<V, E>,
    {
        let key = match args.to_key(&self.key_policy) {
            Ok(key) => key,
            Err(err) => {
                self.metrics.record_rejected_key();
                debug!(cache = self.label, error = %err, "rejected call arguments");
                return Err(err.into());
            }
        };

        if let Some(value) = self.store.get(&key) {
            let value = value.clone();
            self.metrics.record_hit();
            trace!(cache = self.label, len = self.store.len(), "cache hit");
            return Ok(value);
        }

        self.metrics.record_miss();
        debug!(cache = self.label, len = self.store.len(), "cache miss");

        let value = match (self.compute)(args) {
            Ok(value) => value,
            Err(err) => {
                self.metrics.record_failure();
                debug!(cache = self.label, "computation failed, nothing cached");
                return Err(MemoError::Compute(err));
            }
        };

        self.metrics.record_insertion();
        if self.store.insert(key, value.clone()).is_some() {
            self.metrics.record_eviction();
            debug!(
                cache = self.label,
                len = self.store.len(),
                capacity = %self.store.capacity(),
                "evicted least recently used entry"
            );
        }
        Ok(value)
    }

    /// Number of memoized results currently held.
    #[inline]
    pub fn size(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns true if a result for `args` is held. Does not affect recency;
    /// arguments that cannot be keyed are never held.
    pub fn contains(&self, args: &A) -> bool {
        args.to_key(&self.key_policy)
            .is_ok_and(|key| self.store.contains(&key))
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.store.capacity()
    }

    #[inline]
    pub fn key_policy(&self) -> KeyPolicy {
        self.key_policy
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Hit, miss and eviction counters.
    #[inline]
    pub fn stats(&self) -> &MemoMetrics {
        &self.metrics
    }

    /// The underlying entry store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The wrapped computation.
    #[inline]
    pub fn compute_fn(&self) -> &F {
        &self.compute
    }

    /// Drops every memoized result and returns the wrapped computation.
    pub fn into_compute_fn(self) -> F {
        self.compute
    }
}

impl<A, V, F, S> CacheMetrics for MemoCache<A, V, F, S>
where
    A: MemoArgs,
    V: Clone,
    S: Store<A::Key, V>,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.to_btreemap();
        metrics.insert("entries".to_string(), self.store.len() as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        self.store.algorithm_name()
    }
}

impl<A: MemoArgs, V, F, S: fmt::Debug> fmt::Debug for MemoCache<A, V, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("label", &self.label)
            .field("key_policy", &self.key_policy)
            .field("store", &self.store)
            .field("metrics", &self.metrics)
            .finish()
    }
}
