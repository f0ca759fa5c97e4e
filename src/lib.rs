//! # mirai-session
//!
//! Async client for mirai-api-http style bot gateways.
//!
//! ## Features
//!
//! - **Session lifecycle:** single-flight connect, exactly-once release
//! - **Typed errors:** every gateway status code maps to an [`Error`] variant
//! - **Event streams:** WebSocket ingestion with fragment reassembly and
//!   table-driven decoding into [`Event`](events::Event)
//! - **Dispatch chain:** ordered plugins, then per-kind subscribers, first
//!   handler to return `true` wins
//!
//! ## Example
//!
//! ```rust,no_run
//! use mirai_session::events::{Event, EventKind};
//! use mirai_session::{MessageChain, MiraiSession, SessionOptions};
//!
//! # async fn run() -> mirai_session::Result<()> {
//! let session = MiraiSession::with_http_client(reqwest::Client::new());
//!
//! session.subscribe(EventKind::FriendMessage, |session, event| async move {
//!     if let Event::FriendMessage(msg) = event.as_ref() {
//!         let reply = MessageChain::plain(format!("echo: {}", msg.message_chain.text()));
//!         session.send_friend_message(msg.sender.id, &reply, None).await?;
//!     }
//!     Ok(true)
//! });
//!
//! let options = SessionOptions::new("127.0.0.1", 8080, "auth-key");
//! session.connect(options, 10001, false).await?;
//! # session.release().await
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod message;
pub mod plugin_sdk;
pub mod rpc;
pub mod session;
pub mod telemetry;

pub use config::{ClientConfig, SessionOptions};
pub use error::{Error, Result};
pub use message::MessageChain;
pub use session::{ApiVersion, Capabilities, MiraiSession, SessionState};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
