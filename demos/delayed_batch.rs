//! Delayed-update walkthrough: batch a window of requests, then drain.

use delaycache::builder::{CacheBuilder, EvictionPolicy};
use delaycache::traits::CacheRequest;
use delaycache::workload::{KeyDistribution, KeyStream};

fn main() {
    let mut cache = CacheBuilder::new(256).policy(EvictionPolicy::Lru).build();
    let mut stream = KeyStream::new(64, KeyDistribution::Zipfian { exponent: 0.99 }, 42)
        .expect("valid distribution");

    for window in 0..4 {
        for _ in 0..32 {
            let key = stream.next_key();
            cache.get_delayed(CacheRequest::new(key, &[key as u8; 8]));
        }
        println!(
            "window {window}: {} requests buffered, counters still {:?}",
            cache.count_delayed(),
            cache.stats()
        );
        cache.drain_delayed();
        println!(
            "window {window}: drained, counters {:?}, {} bytes cached",
            cache.stats(),
            cache.current_size()
        );
    }
}
