#![deny(missing_docs)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Bounded endpoint cache for client-side service discovery.
//!
//! Clients that resolve dynamic service endpoints discover many distinct keys
//! over the lifetime of a process (regions, accounts, operations). Left
//! unbounded, remembering those discoveries grows without limit. This crate
//! provides a concurrent key-to-endpoint cache that evicts randomly chosen
//! entries once full, plus a resolver that consults the cache before calling
//! the discovery backend.
//!
//! # Features
//!
//! - **Bounded storage**: random eviction holds the cache at its limit with
//!   O(1) bookkeeping and no per-lookup tracking
//! - **No caller-side locking**: `add` and `get` are safe from any thread
//! - **Advisory expiry**: stale addresses are returned, not purged; callers
//!   filter with [`WeightedAddress::has_expired`]
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, SystemTime};
//! use discovery_cache::{Endpoint, EndpointCache, WeightedAddress};
//!
//! let cache = EndpointCache::new(1024);
//!
//! let mut endpoint = Endpoint::new("us-west-2.GetRecords");
//! endpoint.push(WeightedAddress::new(
//!     "https://records.us-west-2.example.com",
//!     SystemTime::now() + Duration::from_secs(60),
//! ));
//! cache.add(endpoint);
//!
//! assert!(cache.get("us-west-2.GetRecords").is_some());
//! ```

mod cache;
mod endpoint;
mod resolve;

pub use cache::EndpointCache;
pub use endpoint::{BoxError, Discoverer, Endpoint, WeightedAddress, build_endpoint_key};
pub use resolve::CachedResolver;
