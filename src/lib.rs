//! Boundcache - A bounded in-memory TTL cache
//!
//! Built for small, well-known key sets with read-heavy access, such as
//! caching a remote list keyed by request URL. Expiry is lazy, eviction only
//! happens when a full cache sweeps its expired entries, and observer hooks
//! always run outside the lock.

pub mod cache;
pub mod config;
pub mod error;
pub mod read_through;

pub use cache::{CacheStats, Hooks, ManualClock, StatsRecorder, TtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use read_through::{Loader, ReadThrough};
