//! Cache-backed endpoint resolution.
//!
//! [`CachedResolver`] is the glue a client SDK sits behind: lookups consult
//! the [`EndpointCache`] first and fall back to the [`Discoverer`] on a miss,
//! collapsing concurrent misses into a single discovery call so a burst of
//! requests for an unseen key costs one RPC, not many.

use tokio::sync::Mutex;

use crate::cache::EndpointCache;
use crate::endpoint::{BoxError, Discoverer, Endpoint};

/// Resolves discovery keys to endpoints, remembering past discoveries.
pub struct CachedResolver<D> {
    cache: EndpointCache,
    discoverer: D,
    inflight: Mutex<()>,
}

impl<D: Discoverer> CachedResolver<D> {
    /// Creates a resolver whose cache holds at most `limit` endpoints.
    #[must_use]
    pub fn new(limit: i64, discoverer: D) -> Self {
        Self {
            cache: EndpointCache::new(limit),
            discoverer,
            inflight: Mutex::new(()),
        }
    }

    /// The underlying endpoint cache.
    #[must_use]
    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }

    /// Resolves the endpoint for `key`, discovering it on a cache miss.
    ///
    /// Cached endpoints are returned as-is, including ones whose addresses
    /// have all expired; filter with [`Endpoint::fresh_addresses`] before
    /// use. On a miss the discovered endpoint is stamped with `key` and
    /// cached before being returned.
    ///
    /// # Errors
    ///
    /// Propagates the discoverer's error; the cache is left unchanged in
    /// that case.
    pub async fn resolve(&self, key: &str) -> Result<Endpoint, BoxError> {
        if let Some(endpoint) = self.cache.get(key) {
            tracing::debug!("endpoint cache hit for key: {key}");
            return Ok(endpoint);
        }

        let _guard = self.inflight.lock().await;

        // Another caller may have finished discovering while we waited
        if let Some(endpoint) = self.cache.get(key) {
            tracing::debug!("endpoint cache hit for key: {key}");
            return Ok(endpoint);
        }

        tracing::debug!("endpoint cache miss for key: {key}, discovering");

        let mut endpoint = match self.discoverer.discover().await {
            Ok(endpoint) => endpoint,
            Err(e) => {
                tracing::warn!("endpoint discovery failed for key {key}: {e}");
                return Err(e);
            }
        };

        endpoint.key = key.to_string();
        self.cache.add(endpoint.clone());

        Ok(endpoint)
    }
}
