//! Concurrent Memoizing Cache Benchmarks
//!
//! Measures the shared cache under hit-heavy and miss-heavy access from
//! several threads. Every call takes the single cache lock, so these numbers
//! show how far that lock scales.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memo_cache::{infallible, Capacity, ConcurrentMemoCache};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

const CACHE_SIZE: usize = 10_000;
const OPS_PER_THREAD: usize = 1_000;

fn work(x: &usize) -> usize {
    x.wrapping_mul(2_654_435_761) >> 7
}

fn bounded(cap: usize) -> Capacity {
    Capacity::Bounded(NonZeroUsize::new(cap).unwrap())
}

/// All threads hit pre-computed keys
fn concurrent_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Hits");

    let cache = Arc::new(ConcurrentMemoCache::new(infallible(work), bounded(CACHE_SIZE)));
    for i in 0..CACHE_SIZE {
        cache.get_or_compute(&i).unwrap();
    }

    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::new("LRU", threads), &threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for i in 0..OPS_PER_THREAD {
                                let key = (t * OPS_PER_THREAD + i) % CACHE_SIZE;
                                black_box(cache.get_or_compute(&key).unwrap());
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

/// Half the calls miss, forcing computation and eviction under the lock
fn concurrent_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Mixed");

    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::new("LRU", threads), &threads, |b, &threads| {
            let cache = Arc::new(ConcurrentMemoCache::new(
                infallible(work),
                bounded(CACHE_SIZE / 10),
            ));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let cache = Arc::clone(&cache);
                        thread::spawn(move || {
                            for i in 0..OPS_PER_THREAD {
                                let key = if i % 2 == 0 {
                                    i % 100
                                } else {
                                    t * CACHE_SIZE + i
                                };
                                black_box(cache.get_or_compute(&key).unwrap());
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, concurrent_hits, concurrent_mixed);
criterion_main!(benches);
