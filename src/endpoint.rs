//! Endpoint data model and the discovery contract.
//!
//! An [`Endpoint`] is the unit stored in the cache: the discovery key it
//! answers for plus an ordered list of weighted addresses, each with its own
//! absolute expiry. Staleness is advisory — the cache hands back stale
//! entries unchanged, and callers filter with
//! [`WeightedAddress::has_expired`] or [`Endpoint::fresh_addresses`] before
//! picking an address.

use std::collections::HashMap;
use std::time::SystemTime;

/// Error type for discovery failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One candidate network address for a discovered endpoint.
///
/// The weight of addresses is currently fixed at 1.0; preference is carried
/// by ordering within the parent [`Endpoint`] instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedAddress {
    /// A URL or `host:port` usable as an alternate service endpoint.
    pub address: String,

    /// Absolute time after which this address must be treated as stale and
    /// not selected for new requests.
    pub expires_at: SystemTime,
}

impl WeightedAddress {
    /// Creates an address that expires at the given instant.
    #[must_use]
    pub fn new(address: impl Into<String>, expires_at: SystemTime) -> Self {
        Self {
            address: address.into(),
            expires_at,
        }
    }

    /// Whether this address is past its expiry.
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.expires_at < SystemTime::now()
    }
}

/// A discovered endpoint: a discovery key and the addresses answering for it.
///
/// The address list may be empty; order is insertion order and carries
/// caller-assigned preference, first to last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// The discovery key this endpoint answers for.
    pub key: String,

    /// Candidate addresses in caller-preference order.
    pub addresses: Vec<WeightedAddress>,
}

impl Endpoint {
    /// Creates an endpoint for the given discovery key with no addresses.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            addresses: Vec::new(),
        }
    }

    /// Appends an address to the end of the preference order.
    pub fn push(&mut self, address: WeightedAddress) {
        self.addresses.push(address);
    }

    /// The most-preferred address, regardless of expiry.
    #[must_use]
    pub fn first_address(&self) -> Option<&str> {
        self.addresses.first().map(|addr| addr.address.as_str())
    }

    /// Addresses that have not yet expired, in preference order.
    #[must_use]
    pub fn fresh_addresses(&self) -> impl Iterator<Item = &WeightedAddress> {
        self.addresses.iter().filter(|addr| !addr.has_expired())
    }
}

/// Builds a discovery key from request parameters.
///
/// Parameter names are sorted alphabetically and the corresponding values
/// joined with `.`, so the same parameter set always yields the same key no
/// matter how the map iterates.
#[must_use]
pub fn build_endpoint_key(params: &HashMap<String, String>) -> String {
    let mut entries: Vec<(&str, &str)> = params
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    entries.sort_unstable_by_key(|&(name, _)| name);

    let values: Vec<&str> = entries.iter().map(|&(_, value)| value).collect();
    values.join(".")
}

/// Contract for the discovery call made on a cache miss.
///
/// Implementors encapsulate whatever parameters the discovery RPC needs; the
/// cache and resolver only ever see the resulting [`Endpoint`].
pub trait Discoverer {
    /// Performs one discovery call.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying discovery transport produced.
    fn discover(&self) -> impl Future<Output = Result<Endpoint, BoxError>> + Send;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    // Helper to create an address expiring the given number of seconds from
    // now (negative offsets produce an already-expired address)
    fn address(addr: &str, offset_secs: i64) -> WeightedAddress {
        let expires_at = if offset_secs < 0 {
            SystemTime::now() - Duration::from_secs(offset_secs.unsigned_abs())
        } else {
            SystemTime::now() + Duration::from_secs(offset_secs.unsigned_abs())
        };

        WeightedAddress::new(addr, expires_at)
    }

    #[test]
    fn address_in_future_has_not_expired() {
        assert!(!address("0", 60).has_expired());
    }

    #[test]
    fn address_in_past_has_expired() {
        assert!(address("0", -1).has_expired());
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut endpoint = Endpoint::new("foo");
        endpoint.push(address("0", 60));
        endpoint.push(address("1", 60));
        endpoint.push(address("2", 60));

        let order: Vec<&str> = endpoint
            .addresses
            .iter()
            .map(|a| a.address.as_str())
            .collect();
        assert_eq!(order, vec!["0", "1", "2"]);
    }

    #[test]
    fn first_address_returns_most_preferred() {
        let mut endpoint = Endpoint::new("foo");
        endpoint.push(address("primary", 60));
        endpoint.push(address("backup", 60));

        assert_eq!(endpoint.first_address(), Some("primary"));
    }

    #[test]
    fn first_address_on_empty_list_is_none() {
        let endpoint = Endpoint::new("foo");
        assert_eq!(endpoint.first_address(), None);
    }

    #[test]
    fn first_address_ignores_expiry() {
        let mut endpoint = Endpoint::new("foo");
        endpoint.push(address("stale", -1));

        assert_eq!(endpoint.first_address(), Some("stale"));
    }

    #[test]
    fn fresh_addresses_filters_expired() {
        let mut endpoint = Endpoint::new("foo");
        endpoint.push(address("stale", -1));
        endpoint.push(address("fresh", 60));
        endpoint.push(address("also-stale", -2));

        let fresh: Vec<&str> = endpoint
            .fresh_addresses()
            .map(|a| a.address.as_str())
            .collect();
        assert_eq!(fresh, vec!["fresh"]);
    }

    #[test]
    fn build_key_sorts_parameter_names() {
        let params = HashMap::from([
            ("region".to_string(), "us-west-2".to_string()),
            ("operation".to_string(), "GetRecords".to_string()),
            ("identity".to_string(), "abc123".to_string()),
        ]);

        // identity < operation < region
        assert_eq!(build_endpoint_key(&params), "abc123.GetRecords.us-west-2");
    }

    #[test]
    fn build_key_single_parameter() {
        let params = HashMap::from([("region".to_string(), "us-west-2".to_string())]);
        assert_eq!(build_endpoint_key(&params), "us-west-2");
    }

    #[test]
    fn build_key_empty_parameters() {
        assert_eq!(build_endpoint_key(&HashMap::new()), "");
    }
}
