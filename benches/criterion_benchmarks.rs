use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memo_cache::config::{Capacity, MemoCacheConfig};
use memo_cache::{call_args, infallible, CallArgs, KeyPolicy, LedgerMemoCache, MemoCache};
use std::convert::Infallible;
use std::num::NonZeroUsize;

fn bounded(cap: usize) -> Capacity {
    Capacity::Bounded(NonZeroUsize::new(cap).unwrap())
}

fn work(x: &usize) -> usize {
    x.wrapping_mul(2_654_435_761) >> 7
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Memo Operations");

    // LRU store
    {
        let mut cache = MemoCache::new(infallible(work), bounded(CACHE_SIZE));
        for i in 0..CACHE_SIZE {
            cache.get_or_compute(&i).unwrap();
        }

        group.bench_function("LRU hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get_or_compute(&(i % CACHE_SIZE)).unwrap());
                }
            });
        });

        let mut next = CACHE_SIZE;
        group.bench_function("LRU miss with eviction", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.get_or_compute(&next).unwrap());
                    next += 1;
                }
            });
        });
    }

    // Ledger store
    {
        let mut cache: LedgerMemoCache<usize, usize, _> = LedgerMemoCache::with_store(
            MemoCacheConfig {
                capacity: bounded(CACHE_SIZE),
                ..MemoCacheConfig::default()
            },
            infallible(work),
        );
        for i in 0..CACHE_SIZE {
            cache.get_or_compute(&i).unwrap();
        }

        group.bench_function("Ledger hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get_or_compute(&(i % CACHE_SIZE)).unwrap());
                }
            });
        });

        let mut next = CACHE_SIZE;
        group.bench_function("Ledger miss with eviction", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.get_or_compute(&next).unwrap());
                    next += 1;
                }
            });
        });
    }

    // Unbounded
    {
        let mut cache = MemoCache::new(infallible(work), Capacity::Unbounded);
        let mut next = 0usize;
        group.bench_function("Unbounded miss", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.get_or_compute(&next).unwrap());
                    next += 1;
                }
            });
        });
    }

    group.finish();
}

/// Eviction cost as the capacity grows: constant for LRU, linear for the ledger.
pub fn eviction_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Eviction Scaling");

    for size in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("LRU", size), &size, |b, &size| {
            let mut cache = MemoCache::new(infallible(work), bounded(size));
            let mut next = 0usize;
            b.iter(|| {
                black_box(cache.get_or_compute(&next).unwrap());
                next += 1;
            });
        });

        group.bench_with_input(BenchmarkId::new("Ledger", size), &size, |b, &size| {
            let mut cache: LedgerMemoCache<usize, usize, _> = LedgerMemoCache::with_store(
                MemoCacheConfig {
                    capacity: bounded(size),
                    ..MemoCacheConfig::default()
                },
                infallible(work),
            );
            let mut next = 0usize;
            b.iter(|| {
                black_box(cache.get_or_compute(&next).unwrap());
                next += 1;
            });
        });
    }

    group.finish();
}

/// Key normalization overhead for dynamic call arguments.
pub fn key_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("Key Building");

    let compute = |args: &CallArgs| Ok::<_, Infallible>(args.positional().len());

    let mut distinct = MemoCache::new(compute, bounded(64));
    group.bench_function("CallArgs distinct hit", |b| {
        b.iter(|| black_box(distinct.get_or_compute(&call_args![1, 2; c = 3, d = 4]).unwrap()));
    });

    let mut unified = MemoCache::init(
        MemoCacheConfig {
            capacity: bounded(64),
            key_policy: KeyPolicy::Unified {
                params: &["a", "b", "c", "d"],
            },
            label: "bench",
        },
        compute,
    );
    group.bench_function("CallArgs unified hit", |b| {
        b.iter(|| black_box(unified.get_or_compute(&call_args![1; b = 2, d = 4, c = 3]).unwrap()));
    });

    let mut typed = MemoCache::new(
        infallible(|&(a, b, c, d): &(i64, i64, i64, i64)| a + b + c + d),
        bounded(64),
    );
    group.bench_function("Tuple hit", |b| {
        b.iter(|| black_box(typed.get_or_compute(&(1, 2, 3, 4)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark, eviction_scaling, key_building);
criterion_main!(benches);
