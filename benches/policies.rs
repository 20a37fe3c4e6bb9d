//! Throughput benchmarks for the three eviction policies under generated
//! request streams.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use delaycache::builder::{CacheBuilder, EvictionPolicy};
use delaycache::traits::CacheRequest;
use delaycache::workload::{KeyDistribution, KeyStream};

const OPERATIONS: usize = 10_000;
const PAYLOAD_LEN: usize = 64;
const CAPACITY: usize = 1024 * PAYLOAD_LEN / 4; // room for a quarter of the universe

fn run_gets(policy: EvictionPolicy, distribution: KeyDistribution) -> (u64, u64) {
    let mut cache = CacheBuilder::new(CAPACITY).policy(policy).build();
    let mut stream = KeyStream::new(1024, distribution, 7).expect("valid distribution");
    let bytes = [0xA5u8; PAYLOAD_LEN];

    for _ in 0..OPERATIONS {
        let key = stream.next_key();
        if cache.get_immediate(CacheRequest::new(key, &bytes)).is_none() {
            stream.record_insert();
        }
    }
    let stats = cache.stats();
    (stats.hits, stats.misses)
}

fn run_delayed_window(policy: EvictionPolicy, window: usize) -> u64 {
    let mut cache = CacheBuilder::new(CAPACITY).policy(policy).build();
    let mut stream = KeyStream::new(1024, KeyDistribution::Zipfian { exponent: 0.99 }, 7)
        .expect("valid distribution");
    let bytes = [0x5Au8; PAYLOAD_LEN];

    for step in 0..OPERATIONS {
        let key = stream.next_key();
        cache.get_delayed(CacheRequest::new(key, &bytes));
        if step % window == window - 1 {
            cache.drain_delayed();
        }
    }
    cache.drain_delayed();
    cache.stats().hits
}

fn bench_immediate_gets(c: &mut Criterion) {
    let mut group = c.benchmark_group("immediate_get_zipfian");
    for (name, policy) in [
        ("fifo", EvictionPolicy::Fifo),
        ("lru", EvictionPolicy::Lru),
        ("lfu", EvictionPolicy::Lfu),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(run_gets(
                    policy,
                    KeyDistribution::Zipfian { exponent: 0.99 },
                ))
            })
        });
    }
    group.finish();
}

fn bench_uniform_gets(c: &mut Criterion) {
    let mut group = c.benchmark_group("immediate_get_uniform");
    for (name, policy) in [
        ("fifo", EvictionPolicy::Fifo),
        ("lru", EvictionPolicy::Lru),
        ("lfu", EvictionPolicy::Lfu),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(run_gets(policy, KeyDistribution::Uniform)))
        });
    }
    group.finish();
}

fn bench_delayed_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("delayed_drain_window");
    for window in [16usize, 256] {
        group.bench_function(format!("lru_window_{window}"), |b| {
            b.iter(|| black_box(run_delayed_window(EvictionPolicy::Lru, window)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_immediate_gets,
    bench_uniform_gets,
    bench_delayed_windows
);
criterion_main!(benches);
