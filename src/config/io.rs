//! Configuration I/O - Loading configuration
//!
//! Handles reading configuration from files and environment variables.

use std::path::Path;

use secrecy::SecretString;

use super::types::ClientConfig;
use crate::error::{Error, Result};

/// Load configuration with layered precedence:
/// 1. Config file (config.json5 / config.toml) if it exists, otherwise defaults
/// 2. Environment variable overrides (includes .env)
pub fn load_config() -> Result<ClientConfig> {
    let config_path = super::paths::config_path();

    let mut config = if config_path.exists() {
        load_config_from_path(&config_path)?
    } else {
        ClientConfig::default()
    };

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<ClientConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    parse_config(&content, path.extension().and_then(|ext| ext.to_str()))
}

/// Parse configuration text, picking the format from a file extension hint
pub fn parse_config(content: &str, extension: Option<&str>) -> Result<ClientConfig> {
    let config = match extension {
        Some("json") | Some("json5") => json5::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON config: {}", e)))?,
        Some("toml") => toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))?,
        _ => json5::from_str(content)
            .or_else(|_| toml::from_str(content).map_err(|e| Error::Config(e.to_string())))
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?,
    };

    Ok(config)
}

/// Apply environment variable overrides to an existing config.
///
/// Loads `.env` if present, then overlays `MIRAI_*`, `RUST_LOG` and
/// `LOG_FORMAT`. Values that fail to parse are ignored.
pub fn apply_env_overrides(config: &mut ClientConfig) {
    dotenvy::dotenv().ok();

    if let Ok(host) = std::env::var("MIRAI_HOST") {
        config.session.host = host;
    }
    if let Ok(port) = std::env::var("MIRAI_PORT") {
        if let Ok(v) = port.parse() {
            config.session.port = v;
        }
    }
    if let Ok(auth_key) = std::env::var("MIRAI_AUTH_KEY") {
        config.session.auth_key = SecretString::from(auth_key);
    }
    if let Ok(account) = std::env::var("MIRAI_ACCOUNT") {
        if let Ok(v) = account.trim().parse() {
            config.account_id = v;
        }
    }
    if let Ok(v) = std::env::var("MIRAI_LISTEN_COMMANDS") {
        config.listen_commands = v == "true" || v == "1";
    }
    if let Ok(timeout) = std::env::var("MIRAI_CONNECT_TIMEOUT") {
        if let Ok(v) = timeout.parse() {
            config.http.connect_timeout_secs = Some(v);
        }
    }

    if let Ok(port) = std::env::var("MIRAI_RELAY_PORT") {
        if let Ok(v) = port.parse() {
            config.relay.port = v;
        }
    }
    if let Ok(host) = std::env::var("MIRAI_RELAY_PUBLIC_HOST") {
        config.relay.public_host = Some(host);
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        config.log.level = level;
    }
    if let Ok(format) = std::env::var("LOG_FORMAT") {
        config.log.format = format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn test_parse_json5_config() {
        let config = parse_config(
            r#"{
                // gateway on the LAN
                session: { host: "192.168.1.5", port: 8888, authKey: "INITKEY" },
                account_id: 10001,
                listen_commands: true,
            }"#,
            Some("json5"),
        )
        .unwrap();

        assert_eq!(config.session.host, "192.168.1.5");
        assert_eq!(config.session.port, 8888);
        assert_eq!(config.session.auth_key.expose_secret(), "INITKEY");
        assert_eq!(config.account_id, 10001);
        assert!(config.listen_commands);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "account_id = 42\n\n[session]\nhost = \"gw\"\nport = 9000\nauthKey = \"k\"\n\n[log]\nformat = \"json\""
        )
        .unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.session.host, "gw");
        assert_eq!(config.account_id, 42);
        assert_eq!(config.log.format, "json");
        assert_eq!(config.log.level, "info,mirai_session=debug");
        assert_eq!(config.relay.capacity, 64);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let err = parse_config("account_id = [", Some("toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
