//! Logging setup
//!
//! The library itself only emits `tracing` events. Applications embedding
//! the client can call [`init_tracing`] to get the same subscriber setup the
//! rest of the stack uses.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install a global `tracing` subscriber configured from `LogConfig`.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let config = LogConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
