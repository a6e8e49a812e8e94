//! Least Recently Used (LRU) Store
//!
//! A hash index over an intrusive doubly linked list. The index maps each key
//! to its list node, so a hit relinks the node to the front and an eviction
//! pops the back, both in O(1).
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Insert: O(1)
//!   - Evict: O(1)
//!
//! - **Space Complexity**:
//!   - O(n) where n is the number of entries. Each key is stored twice (in the
//!     index and in its node) plus two list pointers per entry.
//!
//! # Thread Safety
//!
//! Not thread-safe. Wrap in a lock, or use
//! `ConcurrentMemoCache` with the `concurrent` feature.

extern crate alloc;

use super::{DefaultHashBuilder, HashMap, Store, PREALLOCATE_MAX};
use crate::config::Capacity;
use crate::list::{Node, RecencyList};
use core::fmt;
use core::hash::{BuildHasher, Hash};

/// Production store: O(1) recency updates and evictions.
///
/// # Safety
///
/// The index holds raw pointers into `list`. They stay valid because a node
/// is only freed after its key has been removed from the index, and the
/// store never hands out node pointers.
pub struct LruStore<K, V, S = DefaultHashBuilder> {
    capacity: Capacity,
    list: RecencyList<(K, V)>,
    map: HashMap<K, *mut Node<(K, V)>, S>,
}

// SAFETY: LruStore owns every node its pointers refer to; moving the store
// moves that ownership with it.
unsafe impl<K: Send, V: Send, S: Send> Send for LruStore<K, V, S> {}

// SAFETY: All mutation requires &mut self; shared references cannot cause data races.
unsafe impl<K: Sync, V: Sync, S: Sync> Sync for LruStore<K, V, S> {}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruStore<K, V, S> {
    /// Creates an empty store that hashes keys with `hash_builder`.
    pub fn with_hasher(capacity: Capacity, hash_builder: S) -> Self {
        let reserve = capacity.limit().map_or(0, |n| n.min(PREALLOCATE_MAX));
        LruStore {
            capacity,
            list: RecencyList::new(),
            map: HashMap::with_capacity_and_hasher(reserve, hash_builder),
        }
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let node = self.list.pop_back()?;
        // SAFETY: pop_back only returns value nodes.
        let (key, value) = unsafe { node.into_value() };
        self.map.remove(&key);
        Some((key, value))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Default> Store<K, V> for LruStore<K, V, S> {
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
        let node = self.map.get(key).copied()?;
        // SAFETY: node comes from our index, so it is a live node of `list`.
        unsafe {
            self.list.move_to_front(node);
            Some(&(*node).value().1)
        }
    }

    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node comes from our index.
            unsafe { self.list.move_to_front(node) };
            return None;
        }

        let node = self.list.push_front((key.clone(), value));
        self.map.insert(key, node);

        if self.capacity.is_exceeded_by(self.map.len()) {
            // The new node sits at the front and the bound is at least one,
            // so the back is always an older entry.
            return self.evict_lru();
        }
        None
    }

    fn peek_lru(&self) -> Option<&K> {
        self.list.back().map(|(key, _)| key)
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K, V, S> fmt::Debug for LruStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use core::num::NonZeroUsize;

    fn store<V>(cap: usize) -> LruStore<&'static str, V> {
        LruStore::with_capacity(Capacity::Bounded(NonZeroUsize::new(cap).unwrap()))
    }

    #[test]
    fn test_lru_get_insert() {
        let mut store = store(2);
        assert_eq!(store.insert("apple", 1), None);
        assert_eq!(store.insert("banana", 2), None);
        assert_eq!(store.get(&"apple"), Some(&1));
        assert_eq!(store.get(&"banana"), Some(&2));
        assert_eq!(store.get(&"cherry"), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_lru_evicts_least_recent() {
        let mut store = store(2);
        store.insert("apple", 1);
        store.insert("banana", 2);
        assert_eq!(store.peek_lru(), Some(&"apple"));
        assert_eq!(store.insert("cherry", 3), Some(("apple", 1)));
        assert!(!store.contains(&"apple"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let mut store = store(2);
        store.insert("apple", 1);
        store.insert("banana", 2);
        store.get(&"apple");
        assert_eq!(store.peek_lru(), Some(&"banana"));
        assert_eq!(store.insert("cherry", 3), Some(("banana", 2)));
        assert_eq!(store.get(&"apple"), Some(&1));
    }

    #[test]
    fn test_lru_contains_does_not_touch() {
        let mut store = store(2);
        store.insert("apple", 1);
        store.insert("banana", 2);
        assert!(store.contains(&"apple"));
        assert_eq!(store.insert("cherry", 3), Some(("apple", 1)));
    }

    #[test]
    fn test_lru_insert_existing_keeps_first_value() {
        let mut store = store(2);
        store.insert("apple", 1);
        store.insert("banana", 2);
        assert_eq!(store.insert("apple", 99), None);
        assert_eq!(store.get(&"apple"), Some(&1));
        assert_eq!(store.peek_lru(), Some(&"banana"));
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut store = store(1);
        assert_eq!(store.insert("a", 1), None);
        assert_eq!(store.insert("b", 2), Some(("a", 1)));
        assert_eq!(store.get(&"b"), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lru_unbounded() {
        let mut store: LruStore<u32, u32> = LruStore::with_capacity(Capacity::Unbounded);
        for i in 0..1000 {
            assert_eq!(store.insert(i, i), None);
        }
        assert_eq!(store.len(), 1000);
        assert_eq!(store.peek_lru(), Some(&0));
    }

    #[test]
    fn test_lru_owned_values_dropped() {
        let mut store = store(2);
        store.insert("a", String::from("first"));
        store.insert("b", String::from("second"));
        let evicted = store.insert("c", String::from("third"));
        assert_eq!(evicted, Some(("a", String::from("first"))));
        drop(store);
    }

    #[test]
    fn test_lru_send_across_threads() {
        extern crate std;
        use std::sync::{Arc, Mutex};
        use std::thread;
        use std::vec::Vec;

        let store: LruStore<u32, u32> =
            LruStore::with_capacity(Capacity::Bounded(NonZeroUsize::new(50).unwrap()));
        let store = Arc::new(Mutex::new(store));

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..200u32 {
                        let key = (t * 1000) + (i % 80);
                        let mut guard = store.lock().unwrap();
                        if guard.get(&key).is_none() {
                            guard.insert(key, i);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let guard = store.lock().unwrap();
        assert!(guard.len() <= 50);
    }
}
