//! Image relay configuration

use serde::{Deserialize, Serialize};

/// Where the local image relay listens
///
/// Only gateways up to 1.7.0 use the relay; they fetch uploaded images from
/// it by URL, so `public_host` must be reachable from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    /// 0 picks a free port
    #[serde(default)]
    pub port: u16,
    /// Host put into image URLs; defaults to the bound address
    #[serde(default)]
    pub public_host: Option<String>,
    /// Images kept before the oldest is dropped
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            bind_host: default_bind_host(),
            port: 0,
            public_host: None,
            capacity: default_capacity(),
        }
    }
}

fn default_bind_host() -> String {
    "127.0.0.1".to_string()
}

fn default_capacity() -> usize {
    64
}
