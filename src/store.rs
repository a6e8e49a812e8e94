//! Entry Stores
//!
//! A store owns the memoized entries of a [`MemoCache`](crate::MemoCache),
//! their recency order and the capacity bound. Two implementations exist:
//!
//! | Store | Touch | Insert | Evict | Use |
//! |-------|-------|--------|-------|-----|
//! | [`LruStore`] | O(1) | O(1) | O(1) | production default |
//! | [`LedgerStore`] | O(1) | O(1) | O(n) | reference for comparison and testing |
//!
//! Both evict exactly one entry, the least recently used, when an insert
//! pushes the entry count past a bounded [`Capacity`], and both agree on which
//! entry that is for any sequence of operations.
//!
//! ```text
//!   LruStore                              LedgerStore
//!
//!   map: key ──▶ node                     map: key ──▶ (value, tick)
//!                 │                       tick: 7
//!   head ⇄ [c] ⇄ [a] ⇄ [b] ⇄ tail
//!          MRU              LRU           evict = argmin(tick), linear scan
//! ```

use crate::config::Capacity;

mod ledger;
mod lru;

pub use self::ledger::LedgerStore;
pub use self::lru::LruStore;

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
pub(crate) use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
pub(crate) use std::collections::HashMap;

/// Upper bound on the number of slots reserved up front for a bounded store.
pub(crate) const PREALLOCATE_MAX: usize = 1024;

/// Entry storage with recency tracking and a capacity bound.
///
/// Keys are never updated in place: inserting a key that is already present
/// keeps the stored value and only marks it most recently used.
pub trait Store<K, V> {
    /// Creates an empty store.
    fn with_capacity(capacity: Capacity) -> Self
    where
        Self: Sized;

    /// The configured capacity.
    fn capacity(&self) -> Capacity;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` is stored. Does not affect recency.
    fn contains(&self, key: &K) -> bool;

    /// Returns the stored value and marks it most recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Stores a new entry as most recently used.
    ///
    /// When this takes a bounded store past its capacity the least recently
    /// used entry is removed and returned. The entry just inserted is never
    /// the one evicted.
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// The key that the next eviction would remove.
    fn peek_lru(&self) -> Option<&K>;

    /// Short identifier for metrics and logs.
    fn algorithm_name(&self) -> &'static str;
}
