//! Error types for mirai-session
//!
//! Every remote call ends in either a value or one of these variants. The
//! numeric status codes returned by the gateway map onto the first block of
//! variants through [`Error::from_status_code`]; the rest are raised on the
//! client side.

use thiserror::Error;

/// Result type alias using mirai-session's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mirai-session
#[derive(Error, Debug)]
pub enum Error {
    /// Code 1: the auth key was rejected
    #[error("Invalid auth key")]
    InvalidAuthKey,

    /// Code 2: no bot is logged in under the requested account
    #[error("Bot not found")]
    BotNotFound,

    /// Codes 3 and 4: the session key is invalid or no longer verified
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Code 5: the target friend, group, member or command does not exist
    #[error("Target not found")]
    TargetNotFound,

    /// Code 6: the referenced file does not exist on the gateway
    #[error("File not found")]
    FileNotFound,

    /// Code 10: the bot lacks the permission for this operation
    #[error("Permission denied")]
    PermissionDenied,

    /// Code 20: the bot is muted in the target group
    #[error("Bot is muted")]
    BotMuted,

    /// Code 30: the message exceeds the gateway's length limit
    #[error("Message too long")]
    MessageTooLong,

    /// Code 400: the gateway rejected the request arguments
    #[error("Bad arguments")]
    BadArguments,

    /// A well-formed envelope carrying a code outside the known table
    #[error("Unknown response: {0}")]
    UnknownResponse(String),

    /// The gateway answered with a body that is not JSON at all
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// No session is connected
    #[error("Not connected to a session")]
    NotConnected,

    /// A session is already installed on this client
    #[error("Already connected to a session")]
    AlreadyConnected,

    /// The client has been disposed
    #[error("Session client has been disposed")]
    Disposed,

    /// The connected gateway version cannot perform the operation
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// The in-flight operation was cancelled by session release
    #[error("Operation cancelled")]
    Cancelled,

    /// An inbound frame violated the stream protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Map a gateway status code to its error.
    ///
    /// `raw` is the full response body; it is kept only for codes the table
    /// does not know. Code 0 is success and has no error, callers must check
    /// it before calling this.
    pub fn from_status_code(code: i64, raw: &str) -> Self {
        match code {
            1 => Error::InvalidAuthKey,
            2 => Error::BotNotFound,
            3 | 4 => Error::InvalidSession,
            5 => Error::TargetNotFound,
            6 => Error::FileNotFound,
            10 => Error::PermissionDenied,
            20 => Error::BotMuted,
            30 => Error::MessageTooLong,
            400 => Error::BadArguments,
            _ => Error::UnknownResponse(raw.to_string()),
        }
    }

    /// Check if error concerns authentication or session validity
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAuthKey | Error::BotNotFound | Error::InvalidSession
        )
    }

    /// Check if error is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::BadArguments
                | Error::InvalidInput(_)
                | Error::NotConnected
                | Error::AlreadyConnected
                | Error::Disposed
        )
    }

    /// Check if error came from the transport rather than the gateway
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::WebSocket(_) | Error::Protocol(_) | Error::Io(_)
        )
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid gateway URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_table() {
        let raw = r#"{"code":-1}"#;
        assert!(matches!(Error::from_status_code(1, raw), Error::InvalidAuthKey));
        assert!(matches!(Error::from_status_code(2, raw), Error::BotNotFound));
        assert!(matches!(Error::from_status_code(3, raw), Error::InvalidSession));
        assert!(matches!(Error::from_status_code(4, raw), Error::InvalidSession));
        assert!(matches!(Error::from_status_code(5, raw), Error::TargetNotFound));
        assert!(matches!(Error::from_status_code(6, raw), Error::FileNotFound));
        assert!(matches!(Error::from_status_code(10, raw), Error::PermissionDenied));
        assert!(matches!(Error::from_status_code(20, raw), Error::BotMuted));
        assert!(matches!(Error::from_status_code(30, raw), Error::MessageTooLong));
        assert!(matches!(Error::from_status_code(400, raw), Error::BadArguments));
    }

    #[test]
    fn test_unknown_code_keeps_raw_body() {
        for code in [-1, 7, 11, 50, 401, 500] {
            let raw = format!(r#"{{"code":{},"msg":"odd"}}"#, code);
            match Error::from_status_code(code, &raw) {
                Error::UnknownResponse(body) => assert_eq!(body, raw),
                other => panic!("code {} mapped to {:?}", code, other),
            }
        }
    }

    #[test]
    fn test_classification() {
        assert!(Error::InvalidSession.is_auth_error());
        assert!(!Error::PermissionDenied.is_auth_error());
        assert!(Error::NotConnected.is_client_error());
        assert!(Error::WebSocket("reset".into()).is_connection_error());
        assert!(!Error::BotMuted.is_connection_error());
    }
}
