//! Integration Tests for the Cache
//!
//! Exercises the public API end to end: real-time expiry, concurrent
//! access from many threads, hook reentrancy and hook-driven statistics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;

use boundcache::{CacheConfig, Hooks, ManualClock, StatsRecorder, TtlCache};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("boundcache=trace"))
        .with_test_writer()
        .try_init();
}

// == Expiry ==

#[test]
fn test_sweep_on_full_cache_with_expired_entries() {
    init_tracing();

    let cleaned = Arc::new(Mutex::new(Vec::new()));
    let sets = Arc::new(Mutex::new(Vec::new()));
    let (c, s) = (cleaned.clone(), sets.clone());

    let cache = TtlCache::new(Duration::from_millis(50), 2).with_hooks(
        Hooks::new()
            .on_cleanup(move |_, size, removed: &[String]| {
                let mut removed = removed.to_vec();
                removed.sort();
                c.lock().unwrap().push((size, removed));
            })
            .on_set(move |_, size, key: &str| s.lock().unwrap().push((size, key.to_string()))),
    );

    cache.set("a", 1);
    cache.set("b", 2);
    thread::sleep(Duration::from_millis(60));
    cache.set("c", 3);

    assert_eq!(cache.size(), 1);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("c"), Some(3));
    assert_eq!(
        *cleaned.lock().unwrap(),
        vec![(1, vec!["a".to_string(), "b".to_string()])]
    );
    assert_eq!(sets.lock().unwrap().last(), Some(&(1, "c".to_string())));
}

#[test]
fn test_expired_entry_stays_in_raw_storage() {
    let cache = TtlCache::new(Duration::from_millis(20), 10);

    cache.set("key", "value".to_string());
    thread::sleep(Duration::from_millis(40));

    assert_eq!(cache.get("key"), None);
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.raw_len(), 1);
}

#[test]
fn test_full_cache_rejects_new_key() {
    let cache = TtlCache::from_config(&CacheConfig {
        ttl: Duration::from_secs(60),
        capacity: 3,
    });

    for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
        cache.set(key, i);
    }
    cache.set("d", 3);

    assert_eq!(cache.get("d"), None);
    assert_eq!(cache.size(), 3);
}

// == Concurrency ==

#[test]
fn test_concurrent_disjoint_keys() {
    const THREADS: usize = 8;
    const KEYS_PER_THREAD: usize = 500;

    let stored = Arc::new(AtomicUsize::new(0));
    let s = stored.clone();
    let mut cache = TtlCache::new(Duration::from_secs(60), THREADS * KEYS_PER_THREAD);
    cache.on_set(move |_, _, _| {
        s.fetch_add(1, Ordering::SeqCst);
    });

    let cache = Arc::new(cache);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("t{t}-k{i}");
                    cache.set(key.clone(), t * KEYS_PER_THREAD + i);
                    assert_eq!(cache.get(&key), Some(t * KEYS_PER_THREAD + i));
                    if i % 2 == 0 {
                        cache.delete(&key);
                    }
                    cache.size();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(stored.load(Ordering::SeqCst), THREADS * KEYS_PER_THREAD);
    assert_eq!(cache.size(), THREADS * KEYS_PER_THREAD / 2);
    for t in 0..THREADS {
        for i in (1..KEYS_PER_THREAD).step_by(2) {
            assert_eq!(
                cache.get(&format!("t{t}-k{i}")),
                Some(t * KEYS_PER_THREAD + i)
            );
        }
    }
}

#[test]
fn test_concurrent_writers_never_exceed_capacity() {
    const CAPACITY: usize = 16;

    let cache = Arc::new(TtlCache::new(Duration::from_secs(60), CAPACITY));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    cache.set(format!("w{t}-{i}"), i);
                    assert!(cache.raw_len() <= CAPACITY);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.size(), CAPACITY);
}

// == Hooks ==

#[test]
fn test_hooks_may_reenter_the_cache() {
    type Slot = Arc<OnceLock<Weak<TtlCache<u32>>>>;

    let slot: Slot = Arc::new(OnceLock::new());
    let sizes = Arc::new(Mutex::new(Vec::new()));

    let mut cache = TtlCache::new(Duration::from_secs(60), 4);
    let s = slot.clone();
    cache.on_cache_hit(move |key, _| {
        // Takes the write lock, so the read lock must already be released
        if let Some(cache) = s.get().and_then(Weak::upgrade) {
            cache.delete(key);
        }
    });
    let (s, recorded) = (slot.clone(), sizes.clone());
    cache.on_set(move |_, _, _| {
        if let Some(cache) = s.get().and_then(Weak::upgrade) {
            recorded.lock().unwrap().push(cache.size());
        }
    });

    let cache = Arc::new(cache);
    slot.set(Arc::downgrade(&cache)).unwrap();

    cache.set("a", 1);
    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.get("a"), None);
    assert_eq!(*sizes.lock().unwrap(), vec![1]);
}

#[test]
fn test_miss_and_cleanup_hooks_may_reenter_the_cache() {
    type Slot = Arc<OnceLock<Weak<TtlCache<u32, ManualClock>>>>;

    let slot: Slot = Arc::new(OnceLock::new());
    let cleanups = Arc::new(Mutex::new(Vec::new()));
    let clock = ManualClock::new();

    let mut cache = TtlCache::with_clock(Duration::from_millis(50), 1, clock.clone());
    let s = slot.clone();
    cache.on_cache_miss(move |key| {
        // Takes the write lock, so the read lock must already be released
        if let Some(cache) = s.get().and_then(Weak::upgrade) {
            cache.delete(key);
        }
    });
    let (s, recorded) = (slot.clone(), cleanups.clone());
    cache.on_cleanup(move |_, _, removed| {
        // Runs on the sweep path, after the write lock is dropped
        if let Some(cache) = s.get().and_then(Weak::upgrade) {
            for key in removed {
                cache.delete(key);
            }
            recorded
                .lock()
                .unwrap()
                .push((removed.to_vec(), cache.raw_len()));
        }
    });

    let cache = Arc::new(cache);
    slot.set(Arc::downgrade(&cache)).unwrap();

    // Miss on an expired entry removes it through the hook
    cache.set("a", 1);
    clock.advance(Duration::from_millis(60));
    assert_eq!(cache.raw_len(), 1);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.raw_len(), 0);

    // Full cache with an expired entry sweeps, then the hook reenters
    cache.set("x", 2);
    clock.advance(Duration::from_millis(60));
    cache.set("y", 3);

    assert_eq!(*cleanups.lock().unwrap(), vec![(vec!["x".to_string()], 1)]);
    assert_eq!(cache.get("y"), Some(3));
}

#[test]
fn test_stats_recorder_tracks_activity() {
    let recorder = StatsRecorder::new();
    let cache = TtlCache::new(Duration::from_millis(30), 2).with_hooks(recorder.hooks());

    cache.set("a", "x");
    cache.set("b", "y");
    cache.get("a");
    cache.get("missing");
    thread::sleep(Duration::from_millis(50));
    cache.get("b");
    cache.set("c", "z");

    let stats = recorder.snapshot();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.sets, 3);
    assert_eq!(stats.cleanups, 1);
    assert_eq!(stats.swept, 2);
    assert_eq!(stats.last_size, 1);
    assert_eq!(stats.capacity, 2);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["hits"], 1);
    assert_eq!(json["swept"], 2);
    assert!(json["taken_at"].is_string());
}
