//! Client configuration
//!
//! One immutable configuration value per process, built once and handed
//! to the components that need it. Validation is limited to type/range
//! checks; the values themselves carry no behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{DEFAULT_MAX_CHUNK_SIZE, MAX_FRAME_SIZE};

/// Signaling discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryEndpoint {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    /// Connect timeout in milliseconds
    pub timeout_ms: u64,
}

impl DiscoveryEndpoint {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// TURN relay endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEndpoint {
    pub host: String,
    pub port: u16,
}

/// One ICE server entry handed to the peer connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Which candidate paths the peer connection may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportPolicy {
    /// Any candidate type
    #[default]
    All,
    /// Relay candidates only
    Relay,
}

/// Immutable client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    pub discovery: DiscoveryEndpoint,
    pub relay: RelayEndpoint,
    pub ice_servers: Vec<IceServer>,
    pub transport_policy: TransportPolicy,
    /// Reconnection attempts against the current server before giving up
    pub reconnect_attempts: u32,
    /// Alternate servers to try after the current one is exhausted
    pub alternate_server_tries: u32,
    /// Send-loop flush interval in milliseconds
    pub send_interval_ms: u64,
    /// Keep-alive ping interval in milliseconds
    pub ping_interval_ms: u64,
    /// Per-chunk data cap; must stay below the per-frame transport
    /// ceiling to leave envelope headroom
    pub max_chunk_size: usize,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryEndpoint {
                host: "signal.peerlink.dev".to_string(),
                port: 443,
                secure: true,
                timeout_ms: 10_000,
            },
            relay: RelayEndpoint {
                host: "relay.peerlink.dev".to_string(),
                port: 3478,
            },
            ice_servers: vec![IceServer {
                urls: "stun:stun.l.google.com:19302".to_string(),
                username: None,
                credential: None,
            }],
            transport_policy: TransportPolicy::All,
            reconnect_attempts: 5,
            alternate_server_tries: 3,
            send_interval_ms: 100,
            ping_interval_ms: 25_000,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl PeerConfig {
    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    /// Type/range checks only
    pub fn validate(&self) -> Result<()> {
        if self.discovery.host.is_empty() {
            return Err(Error::InvalidConfig("discovery host is empty".to_string()));
        }
        if self.discovery.port == 0 {
            return Err(Error::InvalidConfig(
                "discovery port must be nonzero".to_string(),
            ));
        }
        if self.discovery.timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "discovery timeout must be nonzero".to_string(),
            ));
        }
        if self.relay.port == 0 {
            return Err(Error::InvalidConfig("relay port must be nonzero".to_string()));
        }
        if self.send_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "send interval must be nonzero".to_string(),
            ));
        }
        if self.ping_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "ping interval must be nonzero".to_string(),
            ));
        }
        if self.max_chunk_size == 0 || self.max_chunk_size >= MAX_FRAME_SIZE {
            return Err(Error::InvalidConfig(format!(
                "max_chunk_size must be in 1..{MAX_FRAME_SIZE}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = PeerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.max_chunk_size < MAX_FRAME_SIZE);
    }

    #[test]
    fn test_chunk_size_bounds() {
        let mut config = PeerConfig::default();
        config.max_chunk_size = 0;
        assert!(config.validate().is_err());
        config.max_chunk_size = MAX_FRAME_SIZE;
        assert!(config.validate().is_err());
        config.max_chunk_size = MAX_FRAME_SIZE - 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = PeerConfig::default();
        config.discovery.port = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_load_keeps_defaults() {
        let config: PeerConfig =
            serde_json::from_str(r#"{"ping_interval_ms": 5000}"#).unwrap();
        assert_eq!(config.ping_interval_ms, 5000);
        assert_eq!(config.max_chunk_size, DEFAULT_MAX_CHUNK_SIZE);
        assert_eq!(config.discovery.port, 443);
    }

    #[test]
    fn test_intervals_as_durations() {
        let config = PeerConfig::default();
        assert_eq!(config.ping_interval(), Duration::from_millis(25_000));
        assert_eq!(config.discovery.timeout(), Duration::from_secs(10));
    }
}
