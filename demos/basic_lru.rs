//! Minimal LRU walkthrough: a hit shields an entry from the next eviction.

use delaycache::builder::{CacheBuilder, EvictionPolicy};
use delaycache::traits::CacheRequest;

fn main() {
    // Room for three 4-byte entries.
    let mut cache = CacheBuilder::new(12).policy(EvictionPolicy::Lru).build();

    for key in 1..=3u64 {
        cache.insert_immediate(CacheRequest::new(key, &[key as u8; 4]));
    }

    // Touch key 1 so key 2 becomes the eviction victim.
    cache.get_immediate(CacheRequest::new(1, &[1u8; 4]));
    cache.insert_immediate(CacheRequest::new(4, &[4u8; 4]));

    for key in 1..=4u64 {
        let found = cache.get_delayed(CacheRequest::new(key, &[key as u8; 4]));
        println!("key {key}: {}", if found.is_some() { "cached" } else { "evicted" });
    }
    println!("size {} / capacity {}", cache.current_size(), cache.capacity());
}
