//! Configuration checks run before connecting
//!
//! Nothing here fails hard; callers decide whether warnings matter.

use secrecy::ExposeSecret;

use super::types::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Connecting with this config cannot succeed
    Error,
    Warning,
}

/// One problem found in a config
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Dotted field path, e.g. `session.port`
    pub field: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

/// Everything [`validate_config`] found
#[derive(Debug, Clone, Default)]
pub struct ConfigValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    fn push(
        &mut self,
        severity: Severity,
        field: &'static str,
        message: impl Into<String>,
        hint: Option<&'static str>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            field,
            message: message.into(),
            hint,
        });
    }
}

/// Check a config for values that make connecting pointless
pub fn validate_config(config: &ClientConfig) -> ConfigValidationResult {
    let mut result = ConfigValidationResult::default();

    if config.session.host.trim().is_empty() {
        result.push(
            Severity::Error,
            "session.host",
            "Gateway host is empty",
            Some("Set MIRAI_HOST or session.host"),
        );
    }

    if config.session.port == 0 {
        result.push(
            Severity::Error,
            "session.port",
            "Gateway port must not be 0",
            Some("Set MIRAI_PORT or session.port"),
        );
    }

    if config.session.auth_key.expose_secret().is_empty() {
        result.push(
            Severity::Error,
            "session.authKey",
            "Auth key is empty",
            Some("Set MIRAI_AUTH_KEY to the authKey configured on the gateway"),
        );
    }

    if config.account_id <= 0 {
        result.push(
            Severity::Warning,
            "account_id",
            "No bot account configured",
            Some("Set MIRAI_ACCOUNT or pass the account to connect()"),
        );
    }

    if !matches!(config.log.format.as_str(), "pretty" | "json") {
        result.push(
            Severity::Warning,
            "log.format",
            format!("Unknown log format '{}', falling back to pretty", config.log.format),
            None,
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionOptions;

    #[test]
    fn test_default_config_lacks_auth_key() {
        let result = validate_config(&ClientConfig::default());

        assert!(!result.is_valid());
        let errors: Vec<_> = result.errors().map(|i| i.field).collect();
        assert_eq!(errors, vec!["session.authKey"]);
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_complete_config_is_clean() {
        let config = ClientConfig {
            session: SessionOptions::new("127.0.0.1", 8080, "INITKEY"),
            account_id: 10001,
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_valid());
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_zero_port() {
        let config = ClientConfig {
            session: SessionOptions::new("gw", 0, "k"),
            account_id: 1,
            log: crate::config::LogConfig {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert_eq!(result.errors().next().map(|i| i.field), Some("session.port"));
        assert_eq!(result.warnings().next().map(|i| i.field), Some("log.format"));
    }
}
