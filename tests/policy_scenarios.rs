// ==============================================
// CROSS-POLICY SCENARIO TESTS (integration)
// ==============================================
//
// End-to-end eviction scenarios and round-trip laws exercised against the
// public surface. Payloads are 4 bytes per entry so byte capacities map
// directly to entry counts.

use delaycache::builder::{CacheBuilder, DelayCache, EvictionPolicy};
use delaycache::policy::{FifoEngine, LfuEngine, LruEngine};
use delaycache::traits::{CacheRequest, CacheStats, DelayableCache};
use delaycache::workload::{KeyDistribution, KeyStream};

fn payload(key: u64) -> [u8; 4] {
    [key as u8; 4]
}

const ALL_POLICIES: [EvictionPolicy; 3] = [
    EvictionPolicy::Fifo,
    EvictionPolicy::Lru,
    EvictionPolicy::Lfu,
];

// ==============================================
// Eviction order
// ==============================================

#[test]
fn lru_evicts_least_recently_used_first() {
    let mut cache = LruEngine::new(12);
    for key in 1..=3 {
        cache.insert_immediate(CacheRequest::new(key, &payload(key)));
    }
    cache.get_immediate(CacheRequest::new(1, &payload(1)));
    cache.insert_immediate(CacheRequest::new(4, &payload(4)));

    assert!(!cache.contains(&2));
    assert_eq!(cache.keys_by_recency(), vec![4, 1, 3]);
    cache.debug_validate_invariants();
}

#[test]
fn fifo_evicts_oldest_insertion_despite_hits() {
    let mut cache = FifoEngine::new(12);
    for key in 1..=3 {
        cache.insert_immediate(CacheRequest::new(key, &payload(key)));
    }
    cache.get_immediate(CacheRequest::new(1, &payload(1)));
    cache.insert_immediate(CacheRequest::new(4, &payload(4)));

    assert!(!cache.contains(&1));
    assert_eq!(cache.keys_by_insertion(), vec![4, 3, 2]);
    cache.debug_validate_invariants();
}

#[test]
fn lfu_evicts_lowest_frequency_first() {
    let mut cache = LfuEngine::new(8);
    cache.insert_immediate(CacheRequest::new(1, &payload(1)));
    cache.insert_immediate(CacheRequest::new(2, &payload(2)));
    cache.get_immediate(CacheRequest::new(1, &payload(1)));
    cache.get_immediate(CacheRequest::new(1, &payload(1)));
    cache.insert_immediate(CacheRequest::new(3, &payload(3)));

    assert!(!cache.contains(&2));
    assert!(cache.contains(&1));
    assert!(cache.contains(&3));
    assert_eq!(cache.frequency(&1), Some(3));
    assert_eq!(cache.frequency(&3), Some(1));
    assert_eq!(cache.min_freq(), Some(1));
    cache.debug_validate_invariants();
}

// ==============================================
// Round-trip and idempotence laws
// ==============================================

#[test]
fn insert_then_get_returns_the_same_bytes() {
    for policy in ALL_POLICIES {
        let mut cache = DelayCache::with_policy(policy, 64);
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        cache.insert_immediate(CacheRequest::new(11, &bytes));
        assert_eq!(
            cache.get_immediate(CacheRequest::new(11, &bytes)),
            Some(&bytes[..]),
            "{policy:?}"
        );
    }
}

#[test]
fn duplicate_insert_keeps_the_first_payload() {
    for policy in ALL_POLICIES {
        let mut cache = DelayCache::with_policy(policy, 8);
        cache.insert_immediate(CacheRequest::new(1, &[0xAA; 4]));
        cache.insert_immediate(CacheRequest::new(1, &[0xBB; 4]));

        assert_eq!(
            cache.get_immediate(CacheRequest::new(1, &[0xAA; 4])),
            Some(&[0xAA; 4][..]),
            "{policy:?}"
        );
        assert_eq!(cache.current_size(), 4);
    }
}

#[test]
fn delayed_insert_plus_drain_matches_immediate_insert_state() {
    for policy in ALL_POLICIES {
        let mut delayed = DelayCache::with_policy(policy, 64);
        delayed.insert_delayed(CacheRequest::new(5, &payload(5)));
        delayed.drain_delayed();

        let mut immediate = DelayCache::with_policy(policy, 64);
        immediate.insert_immediate(CacheRequest::new(5, &payload(5)));

        assert_eq!(delayed.current_size(), immediate.current_size(), "{policy:?}");
        assert_eq!(
            delayed.get_delayed(CacheRequest::new(5, &payload(5))),
            Some(&payload(5)[..])
        );
        // The drained path additionally counted the tag captured at enqueue.
        assert_eq!(delayed.stats(), CacheStats { hits: 0, misses: 1 });
        assert_eq!(immediate.stats(), CacheStats::default());
    }
}

#[test]
fn clear_is_idempotent_and_resets_everything() {
    for policy in ALL_POLICIES {
        let mut cache = DelayCache::with_policy(policy, 64);
        cache.insert_immediate(CacheRequest::new(1, &payload(1)));
        cache.get_immediate(CacheRequest::new(1, &payload(1)));
        cache.get_delayed(CacheRequest::new(2, &payload(2)));

        cache.clear();
        cache.clear();

        assert_eq!(cache.current_size(), 0, "{policy:?}");
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.count_delayed(), 0);
    }
}

// ==============================================
// Capacity control
// ==============================================

#[test]
fn force_evict_frees_requested_bytes_in_policy_order() {
    for policy in [EvictionPolicy::Fifo, EvictionPolicy::Lru] {
        let mut cache = DelayCache::with_policy(policy, 40);
        for key in 1..=10 {
            cache.insert_immediate(CacheRequest::new(key, &payload(key)));
        }
        cache.force_evict(12);
        assert_eq!(cache.current_size(), 28, "{policy:?}");

        // Oldest / least recent victims went first.
        for key in 1..=3 {
            assert_eq!(cache.get_delayed(CacheRequest::new(key, &payload(key))), None);
        }
    }
}

#[test]
fn force_evict_beyond_contents_empties_the_cache() {
    for policy in ALL_POLICIES {
        let mut cache = DelayCache::with_policy(policy, 40);
        for key in 1..=4 {
            cache.insert_immediate(CacheRequest::new(key, &payload(key)));
        }
        cache.force_evict(1_000);
        assert_eq!(cache.current_size(), 0, "{policy:?}");
    }
}

#[test]
fn capacity_decrease_defers_eviction_to_next_insert() {
    for policy in ALL_POLICIES {
        let mut cache = DelayCache::with_policy(policy, 16);
        for key in 1..=4 {
            cache.insert_immediate(CacheRequest::new(key, &payload(key)));
        }
        cache.decr_capacity(8);
        assert_eq!(cache.capacity(), 8, "{policy:?}");
        assert_eq!(cache.current_size(), 16);

        cache.insert_immediate(CacheRequest::new(5, &payload(5)));
        assert!(cache.current_size() <= cache.capacity());
    }
}

#[test]
fn capacity_decrease_saturates_at_zero() {
    for policy in ALL_POLICIES {
        let mut cache = DelayCache::with_policy(policy, 8);
        cache.decr_capacity(1_000_000);
        assert_eq!(cache.capacity(), 0, "{policy:?}");

        // Subsequent inserts find no budget at all.
        cache.insert_immediate(CacheRequest::new(1, &payload(1)));
        assert_eq!(cache.current_size(), 0);
    }
}

// ==============================================
// Budget invariant under generated workloads
// ==============================================

#[test]
fn size_never_exceeds_capacity_under_a_zipfian_workload() {
    for policy in ALL_POLICIES {
        let mut cache = CacheBuilder::new(256).policy(policy).build();
        let mut stream =
            KeyStream::new(512, KeyDistribution::Zipfian { exponent: 0.99 }, 99).unwrap();

        let mut gets = 0u64;
        for step in 0..2_000 {
            let key = stream.next_key();
            let bytes = payload(key);
            match step % 4 {
                0 | 1 => {
                    if cache.get_immediate(CacheRequest::new(key, &bytes)).is_none() {
                        stream.record_insert();
                    }
                    gets += 1;
                },
                2 => cache.insert_immediate(CacheRequest::new(key, &bytes)),
                _ => {
                    cache.erase_immediate(key);
                },
            }
            assert!(
                cache.current_size() <= cache.capacity(),
                "{policy:?}: size {} over capacity {}",
                cache.current_size(),
                cache.capacity()
            );
        }

        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, gets, "{policy:?}");
    }
}
