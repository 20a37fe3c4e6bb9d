//! Opt-in thread-safe wrapper.
//!
//! The engines are deliberately single-threaded; callers that share a cache
//! across threads must provide external mutual exclusion. This module ships
//! that exclusion pre-packaged: a `parking_lot::Mutex` around the façade.
//! The core never engages it.
//!
//! Borrow-returning lookups cannot escape a lock guard, so the lookup
//! methods here run a caller-supplied closure against the payload while the
//! lock is held.

use std::path::Path;

use parking_lot::Mutex;

use crate::builder::DelayCache;
use crate::traits::{CacheRequest, CacheStats, Key};

/// Thread-safe wrapper around [`DelayCache`].
#[derive(Debug)]
pub struct ConcurrentDelayCache {
    inner: Mutex<DelayCache>,
}

impl ConcurrentDelayCache {
    /// Wraps a façade built elsewhere.
    pub fn new(cache: DelayCache) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// See [`DelayCache::insert_immediate`].
    pub fn insert_immediate(&self, req: CacheRequest<'_>) {
        self.inner.lock().insert_immediate(req);
    }

    /// See [`DelayCache::insert_delayed`].
    pub fn insert_delayed(&self, req: CacheRequest<'_>) {
        self.inner.lock().insert_delayed(req);
    }

    /// Runs `f` on the result of an immediate lookup while the lock is held.
    pub fn get_immediate_with<R>(
        &self,
        req: CacheRequest<'_>,
        f: impl FnOnce(Option<&[u8]>) -> R,
    ) -> R {
        let mut cache = self.inner.lock();
        f(cache.get_immediate(req))
    }

    /// Runs `f` on the result of a delayed lookup while the lock is held.
    pub fn get_delayed_with<R>(
        &self,
        req: CacheRequest<'_>,
        f: impl FnOnce(Option<&[u8]>) -> R,
    ) -> R {
        let mut cache = self.inner.lock();
        f(cache.get_delayed(req))
    }

    /// See [`DelayCache::erase_immediate`].
    pub fn erase_immediate(&self, key: Key) -> usize {
        self.inner.lock().erase_immediate(key)
    }

    /// See [`DelayCache::drain_delayed`].
    pub fn drain_delayed(&self) {
        self.inner.lock().drain_delayed();
    }

    /// See [`DelayCache::clear`].
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// See [`DelayCache::dump_status`].
    pub fn dump_status(&self, path: &Path) {
        self.inner.lock().dump_status(path);
    }

    /// See [`DelayCache::incr_capacity`].
    pub fn incr_capacity(&self, n: usize) {
        self.inner.lock().incr_capacity(n);
    }

    /// See [`DelayCache::decr_capacity`].
    pub fn decr_capacity(&self, n: usize) {
        self.inner.lock().decr_capacity(n);
    }

    /// See [`DelayCache::force_evict`].
    pub fn force_evict(&self, n: usize) {
        self.inner.lock().force_evict(n);
    }

    /// See [`DelayCache::capacity`].
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// See [`DelayCache::current_size`].
    pub fn current_size(&self) -> usize {
        self.inner.lock().current_size()
    }

    /// See [`DelayCache::stats`].
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// See [`DelayCache::count_delayed`].
    pub fn count_delayed(&self) -> usize {
        self.inner.lock().count_delayed()
    }
}
