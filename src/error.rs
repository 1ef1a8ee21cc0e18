//! Error types for the cache
//!
//! The cache operations themselves are infallible. Errors only come from
//! the read-through path, where the loader talks to the authoritative source.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The loader failed to produce a value for a missed key
    #[error("Failed to load {key}: {source}")]
    Load {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CacheError {
    /// Returns the key the failed operation was about.
    pub fn key(&self) -> &str {
        match self {
            CacheError::Load { key, .. } => key,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
