//! Configuration types module
//!
//! The top-level [`ClientConfig`] plus the focused sections it is made of.

pub mod http;
pub mod relay;
pub mod session;

use serde::{Deserialize, Serialize};

use self::http::HttpConfig;
use self::relay::RelayConfig;
use self::session::SessionOptions;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway endpoint and credentials
    #[serde(default)]
    pub session: SessionOptions,

    /// Bot account the session binds to
    #[serde(default)]
    pub account_id: i64,

    /// Also open the command stream on connect
    #[serde(default)]
    pub listen_commands: bool,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Image relay for gateways without multipart uploads
    #[serde(default)]
    pub relay: RelayConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            session: SessionOptions::default(),
            account_id: 0,
            listen_commands: false,
            http: HttpConfig::default(),
            relay: RelayConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the config file (if any) and the environment
    ///
    /// Precedence, lowest first:
    /// 1. Default values
    /// 2. Config file (if present)
    /// 3. Environment variable overrides
    pub fn from_env() -> crate::error::Result<Self> {
        crate::config::load_config()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter, in `EnvFilter` syntax
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info,mirai_session=debug".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
