//! HTTP transport configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the `reqwest::Client` a session client builds for itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// TCP connect timeout in seconds; no request timeout is applied
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            connect_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Build an HTTP client from these settings
    pub fn build_client(&self) -> crate::error::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(secs) = self.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}
