//! Cache Store Module
//!
//! Bounded TTL cache: a HashMap behind a reader/writer lock, lazy expiry,
//! and a capacity sweep as the only eviction path.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, Clock, Hooks, SystemClock, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::config::CacheConfig;

// == TTL Cache ==
/// Bounded in-memory cache with a uniform TTL.
///
/// Meant for a small, well-known key set with read-heavy access. Expired
/// entries are never removed in the background: reads treat them as absent
/// and they stay in the map until a full cache sweeps them or they are
/// deleted. A full cache with nothing expired rejects new writes instead of
/// evicting a live entry.
///
/// Hooks run after the lock is released, see [`Hooks`].
pub struct TtlCache<V, C = SystemClock> {
    /// Key-value storage, expired-but-unswept entries included
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// TTL applied to every insertion
    ttl: Duration,
    /// Maximum number of entries held at once
    capacity: usize,
    clock: C,
    hooks: Hooks<V>,
}

impl<V> TtlCache<V, SystemClock> {
    // == Constructor ==
    /// Creates a new cache on the system clock.
    ///
    /// A zero `ttl` or `capacity` is replaced by [`DEFAULT_TTL`] or
    /// [`DEFAULT_CAPACITY`].
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, SystemClock)
    }

    /// Creates a new cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl, config.capacity)
    }
}

impl<V, C: Clock> TtlCache<V, C> {
    /// Creates a new cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, capacity: usize, clock: C) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };

        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity,
            clock,
            hooks: Hooks::new(),
        }
    }

    /// Replaces every hook slot at once.
    pub fn with_hooks(mut self, hooks: Hooks<V>) -> Self {
        self.hooks = hooks;
        self
    }

    // == Hook Registration ==
    // Taking `&mut self` keeps registration ahead of any shared use.

    /// Replaces the hit hook.
    pub fn on_cache_hit<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.hooks.on_cache_hit = Some(Box::new(f));
        self
    }

    /// Replaces the miss hook.
    pub fn on_cache_miss<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.hooks.on_cache_miss = Some(Box::new(f));
        self
    }

    /// Replaces the set hook.
    pub fn on_set<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        self.hooks.on_set = Some(Box::new(f));
        self
    }

    /// Replaces the cleanup hook.
    pub fn on_cleanup<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(usize, usize, &[String]) + Send + Sync + 'static,
    {
        self.hooks.on_cleanup = Some(Box::new(f));
        self
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// An expired entry reads as absent but is left in place.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let found = {
            let entries = self.entries.read();
            let now = self.clock.now();
            entries
                .get(key)
                .filter(|entry| !entry.is_expired(now))
                .map(|entry| entry.value.clone())
        };

        match found {
            Some(value) => {
                trace!(key, "cache hit");
                self.hooks.hit(key, &value);
                Some(value)
            }
            None => {
                trace!(key, "cache miss");
                self.hooks.miss(key);
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` with a fresh expiry of now + TTL.
    ///
    /// When the cache is full, every expired entry is swept first. If it is
    /// still full afterwards the write is dropped, including an overwrite of
    /// a key that is already present.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();

        let (stored, size, swept) = {
            let mut entries = self.entries.write();
            let now = self.clock.now();

            let swept = if entries.len() >= self.capacity {
                let mut removed = Vec::new();
                entries.retain(|k, entry| {
                    if entry.is_expired(now) {
                        removed.push(k.clone());
                        false
                    } else {
                        true
                    }
                });
                Some(removed)
            } else {
                None
            };

            let stored = entries.len() < self.capacity;
            if stored {
                entries.insert(key.clone(), CacheEntry::new(value, self.ttl, now));
            }
            (stored, entries.len(), swept)
        };

        if let Some(removed) = &swept {
            debug!(
                capacity = self.capacity,
                size,
                removed = removed.len(),
                "capacity sweep"
            );
        }
        if stored {
            trace!(key = %key, size, "cache set");
            self.hooks.set(self.capacity, size, &key);
        } else {
            debug!(key = %key, capacity = self.capacity, "cache full, dropping write");
        }
        if let Some(removed) = swept {
            self.hooks.cleanup(self.capacity, size, &removed);
        }
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn delete(&self, key: &str) {
        let removed = self.entries.write().remove(key);
        if removed.is_some() {
            trace!(key, "cache delete");
        }
    }

    // == Size ==
    /// Returns the number of live entries. Expired entries are not counted
    /// even before they are swept.
    pub fn size(&self) -> usize {
        let entries = self.entries.read();
        let now = self.clock.now();
        entries.values().filter(|entry| !entry.is_expired(now)).count()
    }

    /// Returns how long the live entry under `key` has left.
    ///
    /// None if the key is absent or expired, `Duration::MAX` if the entry
    /// never expires. Fires no hooks.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read();
        let now = self.clock.now();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining(now).unwrap_or(Duration::MAX))
    }

    /// Returns the physical map length, expired entries included.
    pub fn raw_len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V, C> fmt::Debug for TtlCache<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("raw_len", &self.entries.read().len())
            .field("hooks", &self.hooks)
            .finish()
    }
}
