//! Plugin SDK - Event handling extensions
//!
//! A plugin is an ordered, stateful event handler that runs ahead of the
//! plain subscribers registered with
//! [`MiraiSession::subscribe`](crate::MiraiSession::subscribe).
//!
//! ## Creating a Plugin
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use mirai_session::events::{Event, EventKind};
//! use mirai_session::plugin_sdk::{Plugin, PluginManifest};
//! use mirai_session::{MiraiSession, Result};
//!
//! pub struct Echo;
//!
//! #[async_trait]
//! impl Plugin for Echo {
//!     fn manifest(&self) -> PluginManifest {
//!         PluginManifest::new("echo", "Echo", "1.0.0").with_event(EventKind::FriendMessage)
//!     }
//!
//!     async fn handle(&self, session: &MiraiSession, event: &Event) -> Result<bool> {
//!         if let Event::FriendMessage(msg) = event {
//!             session
//!                 .send_friend_message(msg.sender.id, &msg.message_chain.without_source(), None)
//!                 .await?;
//!             return Ok(true);
//!         }
//!         Ok(false)
//!     }
//! }
//! ```

mod manifest;
mod registry;
mod traits;

pub use manifest::PluginManifest;
pub use registry::{PluginRegistry, RegisteredPlugin};
pub use traits::Plugin;

// Re-export error types
pub use crate::error::{Error, Result};
