//! Unified cache builder and façade.
//!
//! [`CacheBuilder`] hides the concrete engine types behind a single
//! construction API; [`DelayCache`] holds the chosen engine as an opaque
//! capability and forwards every call unchanged.
//!
//! ## Example
//!
//! ```rust
//! use delaycache::builder::{CacheBuilder, EvictionPolicy};
//! use delaycache::traits::CacheRequest;
//!
//! let mut cache = CacheBuilder::new(4096)
//!     .policy(EvictionPolicy::Lru)
//!     .build();
//! cache.insert_immediate(CacheRequest::new(1, b"payload"));
//! assert_eq!(cache.get_immediate(CacheRequest::new(1, b"payload")), Some(&b"payload"[..]));
//! ```

use std::path::Path;

use crate::policy::{FifoEngine, LfuEngine, LruEngine};
use crate::traits::{CacheRequest, CacheStats, DelayableCache, DrainMode, Key};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// First In, First Out eviction.
    Fifo,
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Least Frequently Used eviction, LRU within a frequency.
    Lfu,
}

/// Builder for [`DelayCache`] instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    policy: EvictionPolicy,
    drain_mode: DrainMode,
}

impl CacheBuilder {
    /// Creates a builder with the given byte capacity, defaulting to the
    /// LRU policy and [`DrainMode::AdmitOnly`].
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: EvictionPolicy::default(),
            drain_mode: DrainMode::default(),
        }
    }

    /// Selects the eviction policy.
    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Selects how `drain_delayed` replays recorded hits.
    pub fn drain_mode(mut self, mode: DrainMode) -> Self {
        self.drain_mode = mode;
        self
    }

    /// Builds the façade around the configured engine.
    pub fn build(self) -> DelayCache {
        let engine: Box<dyn DelayableCache + Send> = match self.policy {
            EvictionPolicy::Fifo => {
                Box::new(FifoEngine::with_drain_mode(self.capacity, self.drain_mode))
            },
            EvictionPolicy::Lru => {
                Box::new(LruEngine::with_drain_mode(self.capacity, self.drain_mode))
            },
            EvictionPolicy::Lfu => {
                Box::new(LfuEngine::with_drain_mode(self.capacity, self.drain_mode))
            },
        };
        DelayCache { engine }
    }
}

/// Policy-agnostic façade over a [`DelayableCache`] engine.
///
/// No logic lives here beyond dispatch; the engine owns all state,
/// counters included.
pub struct DelayCache {
    engine: Box<dyn DelayableCache + Send>,
}

impl DelayCache {
    /// Shorthand for `CacheBuilder::new(capacity).policy(policy).build()`.
    pub fn with_policy(policy: EvictionPolicy, capacity: usize) -> Self {
        CacheBuilder::new(capacity).policy(policy).build()
    }

    /// See [`DelayableCache::insert_immediate`].
    pub fn insert_immediate(&mut self, req: CacheRequest<'_>) {
        self.engine.insert_immediate(req);
    }

    /// See [`DelayableCache::insert_delayed`].
    pub fn insert_delayed(&mut self, req: CacheRequest<'_>) {
        self.engine.insert_delayed(req);
    }

    /// See [`DelayableCache::get_immediate`].
    pub fn get_immediate(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        self.engine.get_immediate(req)
    }

    /// See [`DelayableCache::get_delayed`].
    pub fn get_delayed(&mut self, req: CacheRequest<'_>) -> Option<&[u8]> {
        self.engine.get_delayed(req)
    }

    /// See [`DelayableCache::erase_immediate`].
    pub fn erase_immediate(&mut self, key: Key) -> usize {
        self.engine.erase_immediate(key)
    }

    /// See [`DelayableCache::drain_delayed`].
    pub fn drain_delayed(&mut self) {
        self.engine.drain_delayed();
    }

    /// See [`DelayableCache::clear`].
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// See [`DelayableCache::dump_status`].
    pub fn dump_status(&self, path: &Path) {
        self.engine.dump_status(path);
    }

    /// See [`DelayableCache::incr_capacity`].
    pub fn incr_capacity(&mut self, n: usize) {
        self.engine.incr_capacity(n);
    }

    /// See [`DelayableCache::decr_capacity`].
    pub fn decr_capacity(&mut self, n: usize) {
        self.engine.decr_capacity(n);
    }

    /// See [`DelayableCache::force_evict`].
    pub fn force_evict(&mut self, n: usize) {
        self.engine.force_evict(n);
    }

    /// See [`DelayableCache::capacity`].
    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    /// See [`DelayableCache::current_size`].
    pub fn current_size(&self) -> usize {
        self.engine.current_size()
    }

    /// See [`DelayableCache::stats`].
    pub fn stats(&self) -> CacheStats {
        self.engine.stats()
    }

    /// See [`DelayableCache::count_delayed`].
    pub fn count_delayed(&self) -> usize {
        self.engine.count_delayed()
    }
}

impl std::fmt::Debug for DelayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayCache")
            .field("capacity", &self.engine.capacity())
            .field("current_size", &self.engine.current_size())
            .field("count_delayed", &self.engine.count_delayed())
            .finish()
    }
}
