//! Configuration paths
//!
//! Utilities for resolving configuration file paths.

use std::path::PathBuf;

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MIRAI_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    // Use XDG config directory or fallback
    dirs::config_dir()
        .map(|d| d.join("mirai-session"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".config").join("mirai-session"))
                .unwrap_or_else(|| PathBuf::from(".mirai-session"))
        })
}

/// Get the main configuration file path
///
/// `MIRAI_CONFIG` wins; otherwise the first of `config.json5`, `config.toml`
/// that exists in [`config_dir`], defaulting to `config.json5`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("MIRAI_CONFIG") {
        return PathBuf::from(path);
    }

    let dir = config_dir();
    ["config.json5", "config.toml"]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .unwrap_or_else(|| dir.join("config.json5"))
}
