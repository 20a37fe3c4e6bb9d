//! # Delayable Cache Contract
//!
//! This module defines the operation surface shared by every eviction policy
//! engine, plus the request/record types that flow through it.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────────┐
//!                  │          DelayableCache                  │
//!                  │                                          │
//!                  │  insert_immediate / insert_delayed       │
//!                  │  get_immediate    / get_delayed          │
//!                  │  erase_immediate  / drain_delayed        │
//!                  │  clear / dump_status                     │
//!                  │  incr_capacity / decr_capacity           │
//!                  │  force_evict                             │
//!                  │  capacity / current_size / stats         │
//!                  │  count_delayed                           │
//!                  └───────────────┬──────────────────────────┘
//!                                  │
//!              ┌───────────────────┼───────────────────┐
//!              ▼                   ▼                   ▼
//!       ┌────────────┐     ┌────────────┐      ┌────────────┐
//!       │ FifoEngine │     │ LruEngine  │      │ LfuEngine  │
//!       └────────────┘     └────────────┘      └────────────┘
//! ```
//!
//! ## Two-mode update protocol
//!
//! Every accessor comes in an *immediate* form (state mutates synchronously
//! with the request) and a *delayed* form (the request is recorded together
//! with a hit/miss tag and replayed in bulk on [`drain_delayed`]). Delayed
//! calls never touch counters, recency order, or frequency state; the tag is
//! captured once, at enqueue time.
//!
//! [`drain_delayed`]: DelayableCache::drain_delayed

use std::path::Path;

/// Key type for cached entries.
pub type Key = u64;

/// Hit/miss label captured when a request enters the delayed buffer.
///
/// `Unknown` is the state of a request that has not been classified yet;
/// draining treats it like a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    /// The key was cached when the request was enqueued.
    Hit,
    /// The key was absent when the request was enqueued.
    Miss,
    /// Not yet classified.
    #[default]
    Unknown,
}

impl Classification {
    /// Classifies a request from the key's presence at enqueue time.
    pub fn from_presence(present: bool) -> Self {
        if present { Self::Hit } else { Self::Miss }
    }
}

/// A single cache request.
///
/// The payload bytes are borrowed for the duration of the call; engines copy
/// them into freshly owned buffers on admission, so the caller's buffer is
/// never retained.
#[derive(Debug, Clone, Copy)]
pub struct CacheRequest<'a> {
    /// Identifier of the entry.
    pub key: Key,
    /// Payload carried by the request. Used to admit the entry on an insert
    /// or on a `get` miss.
    pub bytes: &'a [u8],
}

impl<'a> CacheRequest<'a> {
    /// Creates a request for `key` carrying `bytes`.
    pub fn new(key: Key, bytes: &'a [u8]) -> Self {
        Self { key, bytes }
    }
}

/// Snapshot of a cache's hit/miss counters.
///
/// Counters are monotonically non-decreasing over the cache's lifetime and
/// reset only by an explicit [`DelayableCache::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of `get` requests that found their key cached.
    pub hits: u64,
    /// Number of `get` requests that did not.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of `get` requests that hit, or 0.0 before any request.
    pub fn hit_rate(self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// How [`DelayableCache::drain_delayed`] replays recorded requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainMode {
    /// Replay every record through `insert_immediate`: misses are admitted,
    /// hits are no-ops beyond their counter update. The final ordering after
    /// a drain reflects admission order, not the original access order.
    #[default]
    AdmitOnly,
    /// Additionally apply the policy's promotion (LRU move-to-front, LFU
    /// frequency advance) for `Hit` records whose key is still cached at
    /// drain time. Records whose key was evicted in between fall back to
    /// `insert_immediate`.
    PromoteHits,
}

/// Operation surface shared by all eviction policy engines.
///
/// All operations are total and non-fatal: a `get` on an absent key is a
/// miss, an `erase` on an absent key removes zero bytes, and a status dump
/// to an unopenable path silently returns. Engines are single-threaded;
/// callers that need concurrency must provide external mutual exclusion
/// (see [`crate::sync::ConcurrentDelayCache`]).
pub trait DelayableCache {
    /// Inserts the request's payload under its key, evicting victims in
    /// policy order while the byte budget would be exceeded.
    ///
    /// No-op when the key is already cached: the stored payload is kept, no
    /// counter is updated, and no promotion happens.
    fn insert_immediate(&mut self, req: CacheRequest<'_>);

    /// Records the request for a later [`drain_delayed`](Self::drain_delayed),
    /// tagged with the key's presence at enqueue time. No observable state
    /// changes.
    fn insert_delayed(&mut self, req: CacheRequest<'_>);

    /// Looks the key up, updating policy state on a hit.
    ///
    /// On a hit the hit counter is bumped, the policy applies its update
    /// (LRU promotes, LFU advances the frequency, FIFO does nothing), and a
    /// borrow of the stored payload is returned. On a miss the miss counter
    /// is bumped, the request's payload is admitted via an immediate insert,
    /// and `None` is returned.
    fn get_immediate(&mut self, req: CacheRequest<'_>) -> Option<&[u8]>;

    /// Records the request like [`insert_delayed`](Self::insert_delayed) and
    /// returns a borrow of the payload when the key is currently cached.
    ///
    /// Counters and ordering state are not modified; the hit/miss tag is
    /// captured once, at enqueue.
    fn get_delayed(&mut self, req: CacheRequest<'_>) -> Option<&[u8]>;

    /// Removes the entry and returns the number of bytes freed, 0 when the
    /// key is absent.
    fn erase_immediate(&mut self, key: Key) -> usize;

    /// Replays the delayed buffer in enqueue order.
    ///
    /// Each record bumps the counter matching its tag and is then replayed
    /// according to the configured [`DrainMode`]. The buffer is cleared
    /// afterwards.
    fn drain_delayed(&mut self);

    /// Drops every entry, every delayed record, and resets the counters.
    fn clear(&mut self);

    /// Appends one status record describing the current ordering to the file
    /// at `path`. Best-effort: an unopenable path is silently ignored.
    fn dump_status(&self, path: &Path);

    /// Raises the byte capacity ceiling by `n`.
    fn incr_capacity(&mut self, n: usize);

    /// Lowers the byte capacity ceiling by `n`, saturating at zero.
    ///
    /// No eviction happens here; the next immediate insert evicts lazily.
    fn decr_capacity(&mut self, n: usize);

    /// Evicts entries in policy order until at least `n` bytes are freed or
    /// the cache is empty, whichever happens first.
    fn force_evict(&mut self, n: usize);

    /// Current byte capacity ceiling.
    fn capacity(&self) -> usize;

    /// Total bytes currently cached.
    fn current_size(&self) -> usize;

    /// Snapshot of the hit/miss counters.
    fn stats(&self) -> CacheStats;

    /// Number of requests waiting in the delayed buffer.
    fn count_delayed(&self) -> usize;
}
