//! Configuration module
//!
//! - types/mod.rs: `ClientConfig` and `LogConfig`
//! - types/session.rs: gateway endpoint and auth key
//! - types/http.rs: HTTP transport settings
//! - types/relay.rs: local image relay
//! - io.rs: loading from files and the environment
//! - validation.rs: configuration validation
//! - paths.rs: configuration file paths

mod io;
mod paths;
mod types;
mod validation;

pub use types::{ClientConfig, LogConfig};
pub use types::http::HttpConfig;
pub use types::relay::RelayConfig;
pub use types::session::SessionOptions;

pub use io::{apply_env_overrides, load_config, load_config_from_path, parse_config};
pub use paths::{config_dir, config_path};
pub use validation::{validate_config, ConfigValidationResult, Severity, ValidationIssue};
