//! Read-Through Module
//!
//! Consults the cache first and falls back to a [`Loader`] on a miss. The
//! cache is purely an optimization here: a miss or a write dropped at
//! capacity still yields the loaded value.

use std::future::Future;

use tracing::warn;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::error::{CacheError, Result};

/// Fetches values from the authoritative source, e.g. an HTTP endpoint
/// keyed by URL.
pub trait Loader<V>: Send + Sync {
    fn load(&self, key: &str) -> impl Future<Output = anyhow::Result<V>> + Send;
}

/// A [`TtlCache`] populated on demand by a [`Loader`].
#[derive(Debug)]
pub struct ReadThrough<V, L, C = SystemClock> {
    cache: TtlCache<V, C>,
    loader: L,
}

impl<V, L, C> ReadThrough<V, L, C>
where
    V: Clone,
    L: Loader<V>,
    C: Clock,
{
    pub fn new(cache: TtlCache<V, C>, loader: L) -> Self {
        Self { cache, loader }
    }

    /// Returns the cached value for `key`, loading and caching it on a miss.
    ///
    /// A failed load is returned as [`CacheError::Load`] and never cached.
    pub async fn fetch(&self, key: &str) -> Result<V> {
        if let Some(value) = self.cache.get(key) {
            return Ok(value);
        }

        let value = self.loader.load(key).await.map_err(|source| {
            warn!(key, error = %source, "load failed");
            CacheError::Load {
                key: key.to_string(),
                source,
            }
        })?;

        self.cache.set(key, value.clone());
        Ok(value)
    }

    pub fn cache(&self) -> &TtlCache<V, C> {
        &self.cache
    }
}
