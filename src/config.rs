//! Cache configuration.
//!
//! Constructed once and held immutably for the lifetime of a
//! [`RouteCache`](crate::RouteCache); no option is re-read after
//! construction.

use serde::Deserialize;

const DEFAULT_BUCKET: &str = "route-cache";
const DEFAULT_EDGE_ENDPOINT: &str = "https://api.cloudflare.com/client/v4";

/// Configuration for a [`RouteCache`](crate::RouteCache).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Object-store bucket holding cache entries.
    pub bucket: String,
    /// Edge purge configuration. `None` disables every purge call: the
    /// cache then behaves as a pure origin-store cache, with store
    /// correctness unaffected.
    pub edge: Option<EdgeConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            edge: None,
        }
    }
}

impl CacheConfig {
    /// Returns true if purge calls will reach an edge zone.
    pub fn edge_enabled(&self) -> bool {
        self.edge.is_some()
    }
}

/// Edge/CDN control-plane configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    /// Site origin joined with cache keys to form absolute purge URLs,
    /// e.g. `https://example.com`.
    pub origin: String,
    /// Control API base; the zone purge route is appended to it.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Identifier of the edge zone to purge.
    pub zone_id: String,
    /// Bearer token for the control API.
    pub api_token: String,
}

fn default_endpoint() -> String {
    DEFAULT_EDGE_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_edge() {
        let config = CacheConfig::default();
        assert_eq!(config.bucket, "route-cache");
        assert!(!config.edge_enabled());
    }

    #[test]
    fn edge_endpoint_defaults_when_omitted() {
        let config: CacheConfig = serde_json::from_value(serde_json::json!({
            "bucket": "pages",
            "edge": {
                "origin": "https://example.com",
                "zone_id": "zone-1",
                "api_token": "secret",
            },
        }))
        .expect("deserializes");

        assert!(config.edge_enabled());
        let edge = config.edge.expect("edge config");
        assert_eq!(edge.endpoint, DEFAULT_EDGE_ENDPOINT);
        assert_eq!(edge.origin, "https://example.com");
    }
}
