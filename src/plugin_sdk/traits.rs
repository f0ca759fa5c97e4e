//! Plugin traits - Core interface for plugins

use async_trait::async_trait;

use super::manifest::PluginManifest;
use crate::error::Result;
use crate::events::{Event, EventKind};
use crate::session::MiraiSession;

/// Plugin trait - Main interface for plugins
///
/// Plugins run before any subscriber, in registration order. Returning
/// `Ok(true)` from [`handle`](Plugin::handle) marks the event as consumed:
/// no later plugin or subscriber sees it.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Get the plugin manifest
    fn manifest(&self) -> PluginManifest;

    /// Whether this plugin wants events of `kind`
    fn handles(&self, kind: EventKind) -> bool {
        self.manifest().handles(kind)
    }

    /// Handle one event
    async fn handle(&self, session: &MiraiSession, event: &Event) -> Result<bool>;

    /// Called after the plugin is removed from a registry
    fn unregister(&self) -> Result<()> {
        Ok(())
    }
}
