//! Demo of cache-backed endpoint resolution.
//!
//! Resolves a configurable number of distinct discovery keys through a
//! [`CachedResolver`] backed by a canned discoverer, twice. The first pass
//! discovers every key; the second pass shows which entries survived random
//! eviction (hits resolve without a discovery call).
//!
//! # Environment Variables
//!
//! - `CACHE_LIMIT`: maximum cached endpoints (default: 4)
//! - `KEY_COUNT`: number of distinct keys to resolve (default: 8)
//! - `ADDRESS_TTL_SECS`: expiry assigned to discovered addresses (default: 60)

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use discovery_cache::{BoxError, CachedResolver, Discoverer, Endpoint, WeightedAddress};
use tracing::{Level, info};

/// Stand-in for a discovery RPC: hands out a fresh address pair per call.
struct StaticDiscoverer {
    calls: AtomicUsize,
    ttl: Duration,
}

impl Discoverer for StaticDiscoverer {
    fn discover(&self) -> impl Future<Output = Result<Endpoint, BoxError>> + Send {
        async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let expires_at = SystemTime::now() + self.ttl;

            let mut endpoint = Endpoint::default();
            endpoint.push(WeightedAddress::new(
                format!("https://backend-{call}.example.com:443"),
                expires_at,
            ));
            endpoint.push(WeightedAddress::new(
                format!("https://backup-{call}.example.com:443"),
                expires_at,
            ));

            Ok(endpoint)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    // Read configuration from environment
    let cache_limit: i64 = env::var("CACHE_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(4);
    let key_count: usize = env::var("KEY_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8);
    let ttl_secs: u64 = env::var("ADDRESS_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);

    info!("Cache limit: {cache_limit}");
    info!("Distinct keys: {key_count}");
    info!("Address TTL: {ttl_secs}s");

    let resolver = CachedResolver::new(
        cache_limit,
        StaticDiscoverer {
            calls: AtomicUsize::new(0),
            ttl: Duration::from_secs(ttl_secs),
        },
    );

    for pass in 1..=2 {
        for i in 0..key_count {
            let key = format!("us-west-{i}.GetRecords");
            let endpoint = resolver.resolve(&key).await?;

            info!(
                "pass {pass}: {key} -> {} ({} fresh)",
                endpoint.first_address().unwrap_or("<no address>"),
                endpoint.fresh_addresses().count(),
            );
        }
    }

    info!("Cached endpoints: {}", resolver.cache().len());

    Ok(())
}
