//! # First In, First Out (FIFO) engine
//!
//! Insertion-ordered delayable cache. The recency list holds keys newest
//! first, exactly like the LRU engine, but hits never reorder anything:
//! eviction always removes the oldest surviving insertion.
//!
//! | Operation          | Effect on insertion order                  |
//! |--------------------|--------------------------------------------|
//! | `insert_immediate` | new key pushed to front; duplicates no-op  |
//! | `get_immediate`    | none; hits only bump the counter           |
//! | eviction           | pops from the back (oldest insertion)      |
//!
//! Draining replays records through `insert_immediate`, which is a no-op
//! for keys still present, so a drain has no effect beyond counter updates
//! and the admission of misses.

use std::path::Path;

use crate::delayed::DelayedBuffer;
use crate::ds::RecencyList;
use crate::report;
use crate::store::PayloadStore;
use crate::traits::{
    CacheRequest, CacheStats, Classification, DelayableCache, DrainMode, Key,
};

/// Delayable byte-budgeted cache with FIFO eviction.
#[derive(Debug)]
pub struct FifoEngine {
    store: PayloadStore,
    order: RecencyList<Key>,
    delayed: DelayedBuffer,
    stats: CacheStats,
    capacity: usize,
    curr_size: usize,
}

impl FifoEngine {
    /// Creates an engine with the given byte capacity.
    ///
    /// FIFO accepts a [`DrainMode`] for interface parity but has no
    /// promotion to replay; both modes behave identically.
    pub fn new(capacity: usize) -> Self {
        Self {
            store: PayloadStore::new(),
            order: RecencyList::new(),
            delayed: DelayedBuffer::new(),
            stats: CacheStats::default(),
            capacity,
            curr_size: 0,
        }
    }

    /// Creates an engine with an explicit drain replay mode.
    pub fn with_drain_mode(capacity: usize, _drain_mode: DrainMode) -> Self {
        Self::new(capacity)
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

    /// Returns the payload without touching any state.
    pub fn peek(&self, key: &Key) -> Option<&[u8]> {
        self.store.get(key).map(|buf| buf.as_slice())
    }

    /// Cached keys newest-insertion first.
    pub fn keys_by_insertion(&self) -> Vec<Key> {
        self.order.iter().copied().collect()
    }

    fn evict_overflows(&mut self, incoming: usize) {
        while self.curr_size + incoming > self.capacity {
            let Some(victim) = self.order.pop_back() else {
                break;
            };
            let freed = self.store.remove(&victim);
            self.curr_size -= freed;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.store.len(), self.order.iter().count());
        let total: usize = self
            .order
            .iter()
            .map(|key| self.store.len_of(key).expect("payload missing for key"))
            .sum();
        assert_eq!(total, self.curr_size);
        self.order.debug_validate_invariants();
    }
}

impl DelayableCache for FifoEngine {
    fn insert_immediate(&mut self, req: CacheRequest<'_>) {
        if self.store.contains(&req.key) {
            return;
        }
        self.evict_overflows(req.bytes.len());
        if self.curr_size + req.bytes.len() > self.capacity {
            return;
        }
        self.store.put(req.key, req.bytes);
        self.curr_size += req.bytes.len();
        self.order.push_front(req.key);
    }

    fn insert_delayed(&mut self, req: CacheRequest<'_>) {
        let tag = Classification::from_presence(self.store.contains(&req.key));
        self.delayed.push(req.key, req.bytes, tag);
    }

    fn get_immediate(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        if self.store.contains(&req.key) {
            self.stats.hits += 1;
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
        self.order.remove(&key);
        self.curr_size -= payload.len();
        payload.len()
    }

    fn drain_delayed(&mut self) {
        for record in self.delayed.take() {
            match record.tag {
                Classification::Hit => self.stats.hits += 1,
                Classification::Miss | Classification::Unknown => self.stats.misses += 1,
            }
            self.insert_immediate(CacheRequest::new(record.key, &record.bytes));
        }
    }

    fn clear(&mut self) {
        self.store.clear();
        self.order.clear();
        self.delayed.clear();
        self.stats = CacheStats::default();
        self.curr_size = 0;
    }

    fn dump_status(&self, path: &Path) {
        report::append_recency_line(path, self.order.iter().copied());
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
            let Some(victim) = self.order.pop_back() else {
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
