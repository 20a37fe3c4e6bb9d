//! Minimal LFU walkthrough: frequently hit keys outlive one-shot entries.

use delaycache::policy::LfuEngine;
use delaycache::traits::{CacheRequest, DelayableCache};

fn main() {
    // Room for two 4-byte entries.
    let mut cache = LfuEngine::new(8);

    cache.insert_immediate(CacheRequest::new(1, &[1u8; 4]));
    cache.insert_immediate(CacheRequest::new(2, &[2u8; 4]));

    // Key 1 climbs to frequency 3; key 2 stays at 1.
    cache.get_immediate(CacheRequest::new(1, &[1u8; 4]));
    cache.get_immediate(CacheRequest::new(1, &[1u8; 4]));

    // The new entry pressures out the least frequent key, 2.
    cache.insert_immediate(CacheRequest::new(3, &[3u8; 4]));

    for key in 1..=3u64 {
        match cache.frequency(&key) {
            Some(freq) => println!("key {key}: cached at frequency {freq}"),
            None => println!("key {key}: evicted"),
        }
    }
    println!("min populated frequency: {:?}", cache.min_freq());
}
