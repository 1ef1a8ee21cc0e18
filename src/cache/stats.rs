//! Cache Statistics Module
//!
//! Tracks cache activity purely through the event hooks, the way an
//! external metrics collector would.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::Hooks;

// == Cache Stats ==
/// Point-in-time view of the recorded counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of gets that returned a live value
    pub hits: u64,
    /// Number of gets that found nothing live
    pub misses: u64,
    /// Number of sets that stored their entry
    pub sets: u64,
    /// Number of capacity sweeps
    pub cleanups: u64,
    /// Total entries removed by sweeps
    pub swept: u64,
    /// Entry count reported by the most recent set or sweep. Best-effort:
    /// under concurrent sets it may not pair with the same call as `capacity`
    pub last_size: usize,
    /// Capacity reported by the most recent set or sweep
    pub capacity: usize,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no gets have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters fed by [`StatsRecorder::hooks`].
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    cleanups: AtomicU64,
    swept: AtomicU64,
    last_size: AtomicUsize,
    capacity: AtomicUsize,
}

impl StatsRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Builds hooks that record into this recorder.
    pub fn hooks<V: 'static>(self: &Arc<Self>) -> Hooks<V> {
        let (hit, miss, set, cleanup) = (self.clone(), self.clone(), self.clone(), self.clone());

        Hooks::new()
            .on_cache_hit(move |_, _| {
                hit.hits.fetch_add(1, Ordering::Relaxed);
            })
            .on_cache_miss(move |_| {
                miss.misses.fetch_add(1, Ordering::Relaxed);
            })
            .on_set(move |capacity, size, _| {
                set.sets.fetch_add(1, Ordering::Relaxed);
                set.observe_size(capacity, size);
            })
            .on_cleanup(move |capacity, size, removed| {
                cleanup.cleanups.fetch_add(1, Ordering::Relaxed);
                cleanup
                    .swept
                    .fetch_add(removed.len() as u64, Ordering::Relaxed);
                cleanup.observe_size(capacity, size);
            })
    }

    // Two independent relaxed stores; `last_size` is best-effort.
    fn observe_size(&self, capacity: usize, size: usize) {
        self.capacity.store(capacity, Ordering::Relaxed);
        self.last_size.store(size, Ordering::Relaxed);
    }

    /// Returns the current counters.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            cleanups: self.cleanups.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            last_size: self.last_size.load(Ordering::Relaxed),
            capacity: self.capacity.load(Ordering::Relaxed),
            taken_at: Utc::now(),
        }
    }
}
