#![no_std]
extern crate alloc;
extern crate memo_cache;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::convert::Infallible;
use core::num::NonZeroUsize;
use memo_cache::config::{Capacity, MemoCacheConfig};
use memo_cache::{call_args, infallible, CallArgs, KeyPolicy, LedgerMemoCache, MemoCache, Store};

fn bounded(cap: usize) -> Capacity {
    Capacity::Bounded(NonZeroUsize::new(cap).unwrap())
}

#[test]
fn test_string_keys_in_no_std() {
    let calls = Cell::new(0);
    let mut cache = MemoCache::new(
        |name: &String| {
            calls.set(calls.get() + 1);
            Ok::<_, Infallible>(format!("hello, {name}"))
        },
        bounded(2),
    );

    let key1 = String::from("key1");
    let key2 = String::from("key2");
    let key3 = String::from("key3");

    assert_eq!(cache.get_or_compute(&key1).unwrap(), "hello, key1");
    assert_eq!(cache.get_or_compute(&key2).unwrap(), "hello, key2");
    assert_eq!(cache.get_or_compute(&key1).unwrap(), "hello, key1");

    // key2 is least recently used
    cache.get_or_compute(&key3).unwrap();
    assert!(cache.contains(&key1));
    assert!(!cache.contains(&key2));
    assert!(cache.contains(&key3));
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_vec_keys_in_no_std() {
    let mut total = MemoCache::new(
        infallible(|values: &Vec<u32>| values.iter().sum::<u32>()),
        Capacity::Unbounded,
    );
    let keys: Vec<Vec<u32>> = (0..5).map(|i| (0..i).collect()).collect();
    for key in &keys {
        total.get_or_compute(key).unwrap();
    }
    assert_eq!(total.size(), 5);
    assert_eq!(total.get_or_compute(&keys[4]).unwrap(), 6);
    assert_eq!(total.stats().hits, 1);
}

#[test]
fn test_call_args_in_no_std() {
    let config = MemoCacheConfig {
        capacity: bounded(4),
        key_policy: KeyPolicy::Unified { params: &["x", "y"] },
        label: "no_std",
    };
    let mut cache = MemoCache::init(config, |args: &CallArgs| {
        Ok::<_, Infallible>(args.positional().len() + args.named_args().len())
    });

    cache.get_or_compute(&call_args![1, 2]).unwrap();
    cache.get_or_compute(&call_args![1; y = 2]).unwrap();
    cache.get_or_compute(&call_args![; y = 2, x = 1]).unwrap();
    assert_eq!(cache.size(), 1);
    assert!(cache.get_or_compute(&call_args![f64::NAN]).is_err());
}

#[test]
fn test_ledger_store_in_no_std() {
    let mut cache: LedgerMemoCache<u16, u16, _> = LedgerMemoCache::with_store(
        MemoCacheConfig {
            capacity: bounded(2),
            ..MemoCacheConfig::default()
        },
        infallible(|x: &u16| x * 2),
    );
    for key in [1, 2, 1, 3] {
        cache.get_or_compute(&key).unwrap();
    }
    assert_eq!(cache.store().peek_lru(), Some(&1));
    assert!(!cache.contains(&2));
}
