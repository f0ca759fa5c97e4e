//! Gateway endpoint configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Where the gateway lives and how to authenticate against it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    /// Gateway host name or address
    #[serde(default = "default_host")]
    pub host: String,
    /// Gateway HTTP/WebSocket port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Auth key configured on the gateway
    #[serde(skip_serializing, default = "empty_secret")]
    pub auth_key: SecretString,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            host: default_host(),
            port: default_port(),
            auth_key: empty_secret(),
        }
    }
}

impl SessionOptions {
    /// Create options for a host, port and auth key
    pub fn new(host: impl Into<String>, port: u16, auth_key: impl Into<String>) -> Self {
        SessionOptions {
            host: host.into(),
            port,
            auth_key: SecretString::from(auth_key.into()),
        }
    }

    /// Create options from a base URL such as `http://127.0.0.1:8080`
    pub fn from_url(base_url: &str, auth_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(base_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::Config(format!("Gateway URL has no host: {}", base_url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::Config(format!("Gateway URL has no port: {}", base_url)))?;
        Ok(Self::new(host, port, auth_key))
    }

    /// Base URL every HTTP endpoint is relative to
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Absolute URL of an HTTP endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// WebSocket URL of the all-events stream
    pub fn events_url(&self, session_key: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("ws://{}:{}/all", self.host, self.port))?;
        url.query_pairs_mut().append_pair("sessionKey", session_key);
        Ok(url)
    }

    /// WebSocket URL of the command-execution stream
    pub fn commands_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("ws://{}:{}/command", self.host, self.port))?;
        url.query_pairs_mut()
            .append_pair("authKey", self.auth_key.expose_secret());
        Ok(url)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        let options = SessionOptions::from_url("http://10.0.0.2:9000", "key").unwrap();
        assert_eq!(options.host, "10.0.0.2");
        assert_eq!(options.port, 9000);
        assert_eq!(options.auth_key.expose_secret(), "key");
        assert_eq!(options.base_url(), "http://10.0.0.2:9000");
        assert_eq!(options.endpoint("/auth"), "http://10.0.0.2:9000/auth");
    }

    #[test]
    fn test_stream_urls() {
        let options = SessionOptions::new("localhost", 8080, "a b&c");
        assert_eq!(
            options.events_url("S1").unwrap().as_str(),
            "ws://localhost:8080/all?sessionKey=S1"
        );
        assert_eq!(
            options.commands_url().unwrap().as_str(),
            "ws://localhost:8080/command?authKey=a+b%26c"
        );
    }
}
