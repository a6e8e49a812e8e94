//! Ledger Store (reference implementation)
//!
//! Records a monotonically increasing tick for every key on each use and
//! evicts the key with the smallest tick by scanning the whole map. Eviction is
//! therefore O(n). It exists as an easily checked model of LRU behaviour to
//! compare [`LruStore`](super::LruStore) against, not as a production store.

use super::{DefaultHashBuilder, HashMap, Store, PREALLOCATE_MAX};
use crate::config::Capacity;
use core::fmt;
use core::hash::{BuildHasher, Hash};

/// Reference store: O(1) touch, O(n) eviction by linear scan.
pub struct LedgerStore<K, V, S = DefaultHashBuilder> {
    capacity: Capacity,
    map: HashMap<K, (V, u64), S>,
    tick: u64,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LedgerStore<K, V, S> {
    /// Creates an empty store that hashes keys with `hash_builder`.
    pub fn with_hasher(capacity: Capacity, hash_builder: S) -> Self {
        let reserve = capacity.limit().map_or(0, |n| n.min(PREALLOCATE_MAX));
        LedgerStore {
            capacity,
            map: HashMap::with_capacity_and_hasher(reserve, hash_builder),
            tick: 0,
        }
    }

    #[inline]
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn oldest(&self) -> Option<&K> {
        self.map
            .iter()
            .min_by_key(|(_, (_, tick))| *tick)
            .map(|(key, _)| key)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Default> Store<K, V> for LedgerStore<K, V, S> {
    fn with_capacity(capacity: Capacity) -> Self {
        Self::with_hasher(capacity, S::default())
    }

    #[inline]
    fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let tick = self.tick + 1;
        let (value, last_used) = self.map.get_mut(key)?;
        *last_used = tick;
        self.tick = tick;
        Some(value)
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let tick = self.next_tick();
        if let Some((_, last_used)) = self.map.get_mut(&key) {
            *last_used = tick;
            return None;
        }

        self.map.insert(key, (value, tick));

        if !self.capacity.is_exceeded_by(self.map.len()) {
            return None;
        }
        let victim = self.oldest()?.clone();
        let (value, _) = self.map.remove(&victim)?;
        Some((victim, value))
    }

    fn peek_lru(&self) -> Option<&K> {
        self.oldest()
    }

    fn algorithm_name(&self) -> &'static str {
        "LEDGER"
    }
}

impl<K, V, S> fmt::Debug for LedgerStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerStore")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("tick", &self.tick)
            .finish()
    }
}
