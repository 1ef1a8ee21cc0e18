//! Event Hooks Module
//!
//! Optional observer callbacks fired by [`TtlCache`](super::TtlCache).
//!
//! # Locking contract
//! A hook is never invoked while the cache's lock is held. Each operation
//! captures what it needs inside its critical section, releases the lock,
//! and only then calls the hooks on the caller's thread. Hooks may therefore
//! block or call back into the same cache. Hooks fired by different
//! concurrent calls can overlap, so any shared state they touch must be
//! thread-safe.

use std::fmt;

pub type HitHook<V> = Box<dyn Fn(&str, &V) + Send + Sync>;
pub type MissHook = Box<dyn Fn(&str) + Send + Sync>;
/// Receives `(capacity, current_size, key)`.
pub type SetHook = Box<dyn Fn(usize, usize, &str) + Send + Sync>;
/// Receives `(capacity, current_size, removed_keys)`.
pub type CleanupHook = Box<dyn Fn(usize, usize, &[String]) + Send + Sync>;

// == Hooks ==
/// The four hook slots, each independently optional.
pub struct Hooks<V> {
    pub(crate) on_cache_hit: Option<HitHook<V>>,
    pub(crate) on_cache_miss: Option<MissHook>,
    pub(crate) on_set: Option<SetHook>,
    pub(crate) on_cleanup: Option<CleanupHook>,
}

impl<V> Hooks<V> {
    /// Creates a set of hooks with every slot empty.
    pub fn new() -> Self {
        Self {
            on_cache_hit: None,
            on_cache_miss: None,
            on_set: None,
            on_cleanup: None,
        }
    }

    /// Called with the key and value after a successful `get`.
    pub fn on_cache_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.on_cache_hit = Some(Box::new(f));
        self
    }

    /// Called with the key after a `get` that found nothing live.
    pub fn on_cache_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_cache_miss = Some(Box::new(f));
        self
    }

    /// Called after a `set` actually stored its entry.
    pub fn on_set<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        self.on_set = Some(Box::new(f));
        self
    }

    /// Called after a `set` ran a capacity sweep, even one that removed nothing.
    pub fn on_cleanup<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, &[String]) + Send + Sync + 'static,
    {
        self.on_cleanup = Some(Box::new(f));
        self
    }

    pub(crate) fn hit(&self, key: &str, value: &V) {
        if let Some(f) = &self.on_cache_hit {
            f(key, value);
        }
    }

    pub(crate) fn miss(&self, key: &str) {
        if let Some(f) = &self.on_cache_miss {
            f(key);
        }
    }

    pub(crate) fn set(&self, capacity: usize, size: usize, key: &str) {
        if let Some(f) = &self.on_set {
            f(capacity, size, key);
        }
    }

    pub(crate) fn cleanup(&self, capacity: usize, size: usize, removed: &[String]) {
        if let Some(f) = &self.on_cleanup {
            f(capacity, size, removed);
        }
    }
}

impl<V> Default for Hooks<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Hooks<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_cache_hit", &self.on_cache_hit.is_some())
            .field("on_cache_miss", &self.on_cache_miss.is_some())
            .field("on_set", &self.on_set.is_some())
            .field("on_cleanup", &self.on_cleanup.is_some())
            .finish()
    }
}
