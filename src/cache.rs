//! Bounded concurrent endpoint cache with random eviction.
//!
//! # How It Works
//!
//! 1. [`EndpointCache::add`] stores the endpoint under its key, replacing any
//!    previous entry outright (no merging of address lists)
//! 2. A separate atomic counter tracks the entry count, because the live size
//!    of a concurrent map cannot be read cheaply under mutation
//! 3. Whenever the counter exceeds the limit, randomly chosen entries are
//!    removed until the cache is back within bounds
//!
//! Eviction is random rather than least-recently-used on purpose: discovery
//! keys are numerous and their access pattern is not characterized well by
//! recency, so the cache trades a small chance of dropping a hot entry for
//! O(1) bookkeeping with no per-lookup tracking.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use crate::endpoint::Endpoint;

/// A thread-safe, size-bounded store of discovered endpoints.
///
/// All operations take `&self` and are safe to call from any number of
/// threads without external locking. Expired addresses are still returned by
/// [`get`](Self::get); expiry is advisory and filtering is the caller's job.
#[derive(Debug)]
pub struct EndpointCache {
    endpoints: DashMap<String, Endpoint>,
    size: AtomicI64,
    limit: i64,
}

impl EndpointCache {
    /// Creates a cache holding at most `limit` endpoints.
    ///
    /// A zero or negative limit is accepted and produces a degenerate cache
    /// that immediately evicts every inserted entry; pass a positive limit
    /// for a functioning cache.
    #[must_use]
    pub fn new(limit: i64) -> Self {
        Self {
            endpoints: DashMap::new(),
            size: AtomicI64::new(0),
            limit,
        }
    }

    /// Stores `endpoint` under its key, replacing any existing entry.
    ///
    /// If the insertion pushes the cache over its limit, randomly chosen
    /// entries are evicted until the size is back at or under the limit —
    /// possibly including the entry just added. This operation never fails
    /// and never rejects a write.
    pub fn add(&self, endpoint: Endpoint) {
        let key = endpoint.key.clone();
        if self.endpoints.insert(key.clone(), endpoint).is_none() {
            self.size.fetch_add(1, Ordering::SeqCst);
        }

        tracing::debug!("cached endpoint for key: {key}");

        while self.size.load(Ordering::SeqCst) > self.limit {
            if !self.evict_one() {
                break;
            }
        }
    }

    /// Looks up the endpoint stored under `key`.
    ///
    /// Returns a clone of the stored endpoint, or `None` on a miss. Lookup
    /// has no side effects: no recency tracking, no expiry filtering.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Endpoint> {
        self.endpoints.get(key).map(|entry| entry.value().clone())
    }

    /// Number of endpoints currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.size.load(Ordering::SeqCst).max(0)).unwrap_or(0)
    }

    /// Whether the cache holds no endpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes one randomly chosen entry, returning `false` if there was
    /// nothing left to remove.
    fn evict_one(&self) -> bool {
        let len = self.endpoints.len();
        if len == 0 {
            return false;
        }

        // Concurrent removals may shorten the iterator below the picked
        // index; fall back to the first entry. The iterator guards drop at
        // the end of the statement, before remove() locks the same shard.
        let victim = self
            .endpoints
            .iter()
            .nth(fastrand::usize(..len))
            .or_else(|| self.endpoints.iter().next())
            .map(|entry| entry.key().clone());

        let Some(key) = victim else {
            return false;
        };

        if self.endpoints.remove(&key).is_some() {
            self.size.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("evicted endpoint for key: {key}");
        }

        true
    }
}
