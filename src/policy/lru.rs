//! # Least Recently Used (LRU) engine
//!
//! Recency-ordered delayable cache: hits promote the key to the front of
//! the recency list, eviction pops victims from the back.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                       LruEngine                             │
//!   │                                                             │
//!   │   RecencyList<Key>                                          │
//!   │   head ─► [k_4] ◄──► [k_1] ◄──► [k_3] ◄── tail              │
//!   │           (MRU)                  (LRU, next victim)         │
//!   │                                                             │
//!   │   PayloadStore            Key ─► FixedBuffer (owned bytes)  │
//!   │   DelayedBuffer           pending tagged requests           │
//!   │   curr_size / capacity    byte accounting                   │
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Operation          | Effect on recency order                    |
//! |--------------------|--------------------------------------------|
//! | `insert_immediate` | new key pushed to front; duplicates no-op  |
//! | `get_immediate`    | hit moves the key to the front             |
//! | eviction           | pops from the back until the budget fits   |
//!
//! The engine also serves as bucket storage for the LFU engine: a bucket is
//! an `LruEngine` with effectively unbounded capacity whose eviction is
//! driven from outside.

use std::path::Path;

use crate::delayed::DelayedBuffer;
use crate::ds::RecencyList;
use crate::report;
use crate::store::{FixedBuffer, PayloadStore};
use crate::traits::{
    CacheRequest, CacheStats, Classification, DelayableCache, DrainMode, Key,
};

/// Delayable byte-budgeted cache with LRU eviction.
#[derive(Debug)]
pub struct LruEngine {
    store: PayloadStore,
    recency: RecencyList<Key>,
    delayed: DelayedBuffer,
    stats: CacheStats,
    capacity: usize,
    curr_size: usize,
    drain_mode: DrainMode,
}

impl LruEngine {
    /// Creates an engine with the given byte capacity and the default
    /// [`DrainMode::AdmitOnly`] replay.
    pub fn new(capacity: usize) -> Self {
        Self::with_drain_mode(capacity, DrainMode::default())
    }

    /// Creates an engine with an explicit drain replay mode.
    pub fn with_drain_mode(capacity: usize, drain_mode: DrainMode) -> Self {
        Self {
            store: PayloadStore::new(),
            recency: RecencyList::new(),
            delayed: DelayedBuffer::new(),
            stats: CacheStats::default(),
            capacity,
            curr_size: 0,
            drain_mode,
        }
    }

    /// Returns `true` if `key` is currently cached.
    pub fn contains(&self, key: &Key) -> bool {
        self.store.contains(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the payload without touching counters or recency order.
    pub fn peek(&self, key: &Key) -> Option<&[u8]> {
        self.store.get(key).map(|buf| buf.as_slice())
    }

    /// Cached keys in recency order, most recent first.
    pub fn keys_by_recency(&self) -> Vec<Key> {
        self.recency.iter().copied().collect()
    }

    /// Evicts back-of-list victims until `incoming` more bytes fit, or the
    /// cache is empty.
    fn evict_overflows(&mut self, incoming: usize) {
        while self.curr_size + incoming > self.capacity {
            let Some(victim) = self.recency.pop_back() else {
                break;
            };
            let freed = self.store.remove(&victim);
            self.curr_size -= freed;
        }
    }

    // -- bucket-storage interface (used by the LFU engine) ----------------

    /// Admits an already-owned payload at the front without any eviction
    /// check. The caller guarantees the key is absent.
    pub(crate) fn insert_owned(&mut self, key: Key, payload: FixedBuffer) {
        debug_assert!(!self.store.contains(&key));
        self.curr_size += payload.len();
        self.store.put_owned(key, payload);
        self.recency.push_front(key);
    }

    /// Removes `key` and returns the owned payload.
    pub(crate) fn take_entry(&mut self, key: &Key) -> Option<FixedBuffer> {
        let payload = self.store.take(key)?;
        self.recency.remove(key);
        self.curr_size -= payload.len();
        Some(payload)
    }

    /// Removes and returns the least recently used entry.
    pub(crate) fn evict_lru(&mut self) -> Option<(Key, FixedBuffer)> {
        let victim = self.recency.pop_back()?;
        let payload = self.store.take(&victim)?;
        self.curr_size -= payload.len();
        Some((victim, payload))
    }

    /// Moves `key` to the most recent position.
    pub(crate) fn promote(&mut self, key: &Key) -> bool {
        self.recency.move_to_front(key)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.store.len(), self.recency.iter().count());
        let mut total = 0usize;
        for key in self.recency.iter() {
            let len = self.store.len_of(key).expect("payload missing for key");
            total += len;
        }
        assert_eq!(total, self.curr_size);
        self.recency.debug_validate_invariants();
    }
}

impl DelayableCache for LruEngine {
    fn insert_immediate(&mut self, req: CacheRequest<'_>) {
        if self.store.contains(&req.key) {
            return;
        }
        self.evict_overflows(req.bytes.len());
        if self.curr_size + req.bytes.len() > self.capacity {
            // Larger than the whole budget; nothing left to evict.
            return;
        }
        self.store.put(req.key, req.bytes);
        self.curr_size += req.bytes.len();
        self.recency.push_front(req.key);
    }

    fn insert_delayed(&mut self, req: CacheRequest<'_>) {
        let tag = Classification::from_presence(self.store.contains(&req.key));
        self.delayed.push(req.key, req.bytes, tag);
    }

    fn get_immediate(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        if self.store.contains(&req.key) {
            self.stats.hits += 1;
            self.recency.move_to_front(&req.key);
            self.store.get(&req.key).map(|buf| buf.as_slice())
        } else {
            self.stats.misses += 1;
            self.insert_immediate(req);
            None
        }
    }

    fn get_delayed(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        let key = req.key;
        self.insert_delayed(req);
        self.store.get(&key).map(|buf| buf.as_slice())
    }

    fn erase_immediate(&mut self, key: Key) -> usize {
        let Some(payload) = self.store.take(&key) else {
            return 0;
        };
        self.recency.remove(&key);
        self.curr_size -= payload.len();
        payload.len()
    }

    fn drain_delayed(&mut self) {
        for record in self.delayed.take() {
            match record.tag {
                Classification::Hit => self.stats.hits += 1,
                Classification::Miss | Classification::Unknown => self.stats.misses += 1,
            }
            let promote = self.drain_mode == DrainMode::PromoteHits
                && record.tag == Classification::Hit
                && self.store.contains(&record.key);
            if promote {
                self.recency.move_to_front(&record.key);
            } else {
                self.insert_immediate(CacheRequest::new(record.key, &record.bytes));
            }
        }
    }

    fn clear(&mut self) {
        self.store.clear();
        self.recency.clear();
        self.delayed.clear();
        self.stats = CacheStats::default();
        self.curr_size = 0;
    }

    fn dump_status(&self, path: &Path) {
        report::append_recency_line(path, self.recency.iter().copied());
    }

    fn incr_capacity(&mut self, n: usize) {
        self.capacity = self.capacity.saturating_add(n);
    }

    fn decr_capacity(&mut self, n: usize) {
        self.capacity = self.capacity.saturating_sub(n);
    }

    fn force_evict(&mut self, n: usize) {
        let mut freed = 0usize;
        while freed < n {
            let Some(victim) = self.recency.pop_back() else {
                break;
            };
            let size = self.store.remove(&victim);
            self.curr_size -= size;
            freed += size;
        }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn current_size(&self) -> usize {
        self.curr_size
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }

    fn count_delayed(&self) -> usize {
        self.delayed.len()
    }
}
