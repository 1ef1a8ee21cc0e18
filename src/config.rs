//! Configuration Module
//!
//! Handles loading cache parameters from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};

/// Cache configuration parameters.
///
/// Zero values are accepted here and replaced by the defaults when the
/// cache is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live applied to every insertion
    pub ttl: Duration,
    /// Maximum number of entries, expired-but-unswept ones included
    pub capacity: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - TTL in milliseconds (default: 300000)
    /// - `CACHE_CAPACITY` - Maximum entries (default: 10000)
    pub fn from_env() -> Self {
        Self {
            ttl: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TTL),
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
        }
    }
}
