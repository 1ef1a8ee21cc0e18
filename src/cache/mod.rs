//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration, a capacity
//! sweep, and observer hooks.

mod clock;
mod entry;
mod hooks;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use hooks::{CleanupHook, HitHook, Hooks, MissHook, SetHook};
pub use stats::{CacheStats, StatsRecorder};
pub use store::TtlCache;

use std::time::Duration;

// == Public Constants ==
/// TTL used when a zero TTL is configured
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Capacity used when a zero capacity is configured
pub const DEFAULT_CAPACITY: usize = 10_000;
