//! # Least Frequently Used (LFU) engine
//!
//! Frequency-ordered delayable cache built by composition: every distinct
//! hit count owns an [`LruEngine`] bucket with effectively unbounded
//! capacity, kept in a `BTreeMap` so the populated counts stay ordered.
//! The LFU engine owns global eviction and the running byte total; the
//! buckets are pure ordered storage.
//!
//! ## Architecture
//!
//! ```text
//!   freq_of: Key ─► count          buckets: BTreeMap<count, LruEngine>
//!
//!   min_freq ──► 1 ─► [k_9] ◄──► [k_2]      (LRU order inside bucket)
//!                3 ─► [k_5]
//!                7 ─► [k_1] ◄──► [k_4]
//! ```
//!
//! A hit on a key at count `c` moves it from bucket `c` to the front of
//! bucket `c+1`, deleting bucket `c` when it empties. Eviction removes the
//! least recently used key of `buckets[min_freq]`. A key re-inserted after
//! eviction always re-enters at count 1; frequency history does not survive
//! eviction.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::delayed::DelayedBuffer;
use crate::policy::lru::LruEngine;
use crate::report;
use crate::store::FixedBuffer;
use crate::traits::{
    CacheRequest, CacheStats, Classification, DelayableCache, DrainMode, Key,
};

/// Delayable byte-budgeted cache with LFU eviction, LRU within a frequency.
#[derive(Debug)]
pub struct LfuEngine {
    buckets: BTreeMap<u64, LruEngine>,
    freq_of: FxHashMap<Key, u64>,
    /// Smallest populated bucket count, 0 while the cache is empty.
    min_freq: u64,
    delayed: DelayedBuffer,
    stats: CacheStats,
    capacity: usize,
    curr_size: usize,
    drain_mode: DrainMode,
}

impl LfuEngine {
    /// Creates an engine with the given byte capacity and the default
    /// [`DrainMode::AdmitOnly`] replay.
    pub fn new(capacity: usize) -> Self {
        Self::with_drain_mode(capacity, DrainMode::default())
    }

    /// Creates an engine with an explicit drain replay mode.
    pub fn with_drain_mode(capacity: usize, drain_mode: DrainMode) -> Self {
        Self {
            buckets: BTreeMap::new(),
            freq_of: FxHashMap::default(),
            min_freq: 0,
            delayed: DelayedBuffer::new(),
            stats: CacheStats::default(),
            capacity,
            curr_size: 0,
            drain_mode,
        }
    }

    /// Returns `true` if `key` is currently cached.
    pub fn contains(&self, key: &Key) -> bool {
        self.freq_of.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.freq_of.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.freq_of.is_empty()
    }

    /// Current hit count of `key`.
    pub fn frequency(&self, key: &Key) -> Option<u64> {
        self.freq_of.get(key).copied()
    }

    /// Smallest populated bucket count.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Keys of the bucket at `freq`, most recently used first.
    pub fn bucket_keys(&self, freq: u64) -> Vec<Key> {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.keys_by_recency())
            .unwrap_or_default()
    }

    /// Returns the payload without touching counters or frequency state.
    pub fn peek(&self, key: &Key) -> Option<&[u8]> {
        let freq = *self.freq_of.get(key)?;
        self.buckets.get(&freq).and_then(|bucket| bucket.peek(key))
    }

    fn unbounded_bucket() -> LruEngine {
        LruEngine::new(usize::MAX)
    }

    fn refresh_min_freq(&mut self) {
        self.min_freq = self.buckets.keys().next().copied().unwrap_or(0);
    }

    fn drop_bucket_if_empty(&mut self, freq: u64) {
        let emptied = self
            .buckets
            .get(&freq)
            .map(|bucket| bucket.is_empty())
            .unwrap_or(false);
        if emptied {
            self.buckets.remove(&freq);
            self.refresh_min_freq();
        }
    }

    /// Admits an absent key at frequency 1.
    fn admit(&mut self, key: Key, payload: FixedBuffer) {
        self.curr_size += payload.len();
        self.freq_of.insert(key, 1);
        self.buckets
            .entry(1)
            .or_insert_with(Self::unbounded_bucket)
            .insert_owned(key, payload);
        self.min_freq = 1;
    }

    /// Moves a cached key from bucket `c` to the front of bucket `c + 1`
    /// and returns the new count.
    fn advance_frequency(&mut self, key: &Key) -> Option<u64> {
        let freq = *self.freq_of.get(key)?;
        let next = freq.saturating_add(1);
        if next == freq {
            // Counter saturated; refresh recency within the bucket instead.
            if let Some(bucket) = self.buckets.get_mut(&freq) {
                bucket.promote(key);
            }
            return Some(freq);
        }

        let payload = self.buckets.get_mut(&freq)?.take_entry(key)?;
        self.drop_bucket_if_empty(freq);

        self.freq_of.insert(*key, next);
        self.buckets
            .entry(next)
            .or_insert_with(Self::unbounded_bucket)
            .insert_owned(*key, payload);
        self.refresh_min_freq();
        Some(next)
    }

    /// Evicts the least recently used key of the minimum-frequency bucket.
    /// Returns the bytes freed, `None` when the cache is empty.
    fn evict_min(&mut self) -> Option<usize> {
        let freq = self.min_freq;
        if freq == 0 {
            return None;
        }
        let (victim, payload) = self.buckets.get_mut(&freq)?.evict_lru()?;
        let freed = payload.len();
        self.freq_of.remove(&victim);
        self.curr_size -= freed;
        self.drop_bucket_if_empty(freq);
        Some(freed)
    }

    fn evict_overflows(&mut self, incoming: usize) {
        while self.curr_size + incoming > self.capacity {
            if self.evict_min().is_none() {
                break;
            }
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let bucket_total: usize = self.buckets.values().map(|bucket| bucket.len()).sum();
        assert_eq!(self.freq_of.len(), bucket_total);

        if self.freq_of.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert_eq!(Some(self.min_freq), self.buckets.keys().next().copied());
        let mut byte_total = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(!bucket.is_empty());
            for key in bucket.keys_by_recency() {
                assert_eq!(self.freq_of.get(&key), Some(&freq));
                byte_total += bucket.peek(&key).expect("payload missing").len();
            }
        }
        assert_eq!(byte_total, self.curr_size);
    }
}

impl DelayableCache for LfuEngine {
    fn insert_immediate(&mut self, req: CacheRequest<'_>) {
        if self.freq_of.contains_key(&req.key) {
            return;
        }
        self.evict_overflows(req.bytes.len());
        if self.curr_size + req.bytes.len() > self.capacity {
            return;
        }
        self.admit(req.key, FixedBuffer::copy_of(req.bytes));
    }

    fn insert_delayed(&mut self, req: CacheRequest<'_>) {
        let tag = Classification::from_presence(self.freq_of.contains_key(&req.key));
        self.delayed.push(req.key, req.bytes, tag);
    }

    fn get_immediate(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        if !self.freq_of.contains_key(&req.key) {
            self.stats.misses += 1;
            self.insert_immediate(req);
            return None;
        }
        self.stats.hits += 1;
        let freq = self.advance_frequency(&req.key)?;
        self.buckets
            .get(&freq)
            .and_then(|bucket| bucket.peek(&req.key))
    }

    fn get_delayed(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        let key = req.key;
        self.insert_delayed(req);
        self.peek(&key)
    }

    fn erase_immediate(&mut self, key: Key) -> usize {
        let Some(freq) = self.freq_of.remove(&key) else {
            return 0;
        };
        let Some(payload) = self
            .buckets
            .get_mut(&freq)
            .and_then(|bucket| bucket.take_entry(&key))
        else {
            return 0;
        };
        self.curr_size -= payload.len();
        self.drop_bucket_if_empty(freq);
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
                && self.freq_of.contains_key(&record.key);
            if promote {
                self.advance_frequency(&record.key);
            } else {
                self.insert_immediate(CacheRequest::new(record.key, &record.bytes));
            }
        }
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.freq_of.clear();
        self.min_freq = 0;
        self.delayed.clear();
        self.stats = CacheStats::default();
        self.curr_size = 0;
    }

    fn dump_status(&self, path: &Path) {
        report::append_frequency_lines(
            path,
            self.buckets
                .iter()
                .map(|(freq, bucket)| (*freq, bucket.keys_by_recency())),
        );
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
            match self.evict_min() {
                Some(size) => freed += size,
                None => break,
            }
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
