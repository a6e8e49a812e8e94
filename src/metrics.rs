//! Cache Metrics
//!
//! Counters kept by every [`MemoCache`](crate::MemoCache) and a reporting trait
//! that exposes them as a `BTreeMap`, so metric names always come out in the
//! same order.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters for one memoizing cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoMetrics {
    /// Calls to `get_or_compute`, including rejected ones.
    pub requests: u64,

    /// Calls answered from the cache.
    pub hits: u64,

    /// Calls that invoked the wrapped computation.
    pub misses: u64,

    /// Results stored after a successful computation.
    pub insertions: u64,

    /// Entries removed to stay within capacity.
    pub evictions: u64,

    /// Misses whose computation returned an error (not cached).
    pub failed_computations: u64,

    /// Calls whose arguments could not be turned into a key.
    pub rejected_keys: u64,
}

impl MemoMetrics {
    pub(crate) fn record_hit(&mut self) {
        self.requests += 1;
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.requests += 1;
        self.misses += 1;
    }

    pub(crate) fn record_rejected_key(&mut self) {
        self.requests += 1;
        self.rejected_keys += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_computations += 1;
    }

    pub(crate) fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Fraction of keyed lookups served from the cache, 0.0 when none were made.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups > 0 {
            self.hits as f64 / lookups as f64
        } else {
            0.0
        }
    }

    /// Fraction of keyed lookups that had to compute, 0.0 when none were made.
    pub fn miss_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups > 0 {
            self.misses as f64 / lookups as f64
        } else {
            0.0
        }
    }

    /// All counters and rates keyed by name.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.hits as f64);
        metrics.insert("cache_misses".to_string(), self.misses as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert(
            "failed_computations".to_string(),
            self.failed_computations as f64,
        );
        metrics.insert("rejected_keys".to_string(), self.rejected_keys as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics
    }
}

/// Uniform metrics reporting for caches.
pub trait CacheMetrics {
    /// All metrics as name/value pairs in alphabetical order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Identifier of the eviction algorithm, e.g. `"LRU"`.
    fn algorithm_name(&self) -> &'static str;
}
