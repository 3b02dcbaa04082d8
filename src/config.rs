//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_CACHE_BYTES;
use crate::peers::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

/// Peer addresses used when `PEERS` is not set.
const DEFAULT_PEERS: [&str; 3] = [
    "http://localhost:8001",
    "http://localhost:8002",
    "http://localhost:8003",
];

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the demo group
    pub group_name: String,
    /// Byte budget of the group's local cache
    pub cache_bytes: usize,
    /// This node's base URL, as it appears in `peers`
    pub self_addr: String,
    /// Base URLs of every node in the cluster, including this one
    pub peers: Vec<String>,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Path prefix of the peer endpoint
    pub base_path: String,
    /// Port of the optional front-end API server
    pub api_port: Option<u16>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `GROUP_NAME` - Group name (default: scores)
    /// - `CACHE_BYTES` - Local cache budget in bytes (default: 2048)
    /// - `SELF_ADDR` - This node's base URL (default: http://localhost:8001)
    /// - `PEERS` - Comma-separated base URLs (default: localhost 8001-8003)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `BASE_PATH` - Peer endpoint prefix (default: /_geecache/)
    /// - `API_PORT` - Start the front-end API on this port (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_bytes),
            self_addr: env::var("SELF_ADDR")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.self_addr),
            peers: env::var("PEERS")
                .ok()
                .map(|v| parse_peers(&v))
                .filter(|peers| !peers.is_empty())
                .unwrap_or(defaults.peers),
            replicas: env::var("REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.replicas),
            base_path: env::var("BASE_PATH").unwrap_or(defaults.base_path),
            api_port: env::var("API_PORT").ok().and_then(|v| v.parse().ok()),
        }
    }

    /// Port the peer server listens on, taken from `self_addr`.
    pub fn listen_port(&self) -> Option<u16> {
        url::Url::parse(&self.self_addr).ok()?.port_or_known_default()
    }
}

/// Splits a comma-separated peer list, dropping blanks and trailing slashes.
fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_name: "scores".to_string(),
            cache_bytes: DEFAULT_CACHE_BYTES,
            self_addr: DEFAULT_PEERS[0].to_string(),
            peers: DEFAULT_PEERS.iter().map(|p| p.to_string()).collect(),
            replicas: DEFAULT_REPLICAS,
            base_path: DEFAULT_BASE_PATH.to_string(),
            api_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.group_name, "scores");
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.self_addr, "http://localhost:8001");
        assert_eq!(config.peers.len(), 3);
        assert_eq!(config.replicas, 50);
        assert_eq!(config.base_path, "/_geecache/");
        assert!(config.api_port.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for var in [
            "GROUP_NAME",
            "CACHE_BYTES",
            "SELF_ADDR",
            "PEERS",
            "REPLICAS",
            "BASE_PATH",
            "API_PORT",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.self_addr, "http://localhost:8001");
        assert_eq!(config.peers, Config::default().peers);
        assert!(config.api_port.is_none());
    }

    #[test]
    fn test_parse_peers() {
        let peers = parse_peers(" http://a:1/, ,http://b:2 ");
        assert_eq!(peers, vec!["http://a:1", "http://b:2"]);
    }

    #[test]
    fn test_listen_port() {
        let mut config = Config::default();
        assert_eq!(config.listen_port(), Some(8001));

        config.self_addr = "http://cache.internal".to_string();
        assert_eq!(config.listen_port(), Some(80));

        config.self_addr = "not a url".to_string();
        assert_eq!(config.listen_port(), None);
    }
}
