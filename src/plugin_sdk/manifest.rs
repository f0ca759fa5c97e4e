//! Plugin manifest - Metadata describing a plugin

use serde::{Deserialize, Serialize};

use crate::events::EventKind;

/// Plugin manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin ID
    pub id: String,
    /// Plugin name
    pub name: String,
    /// Plugin version
    pub version: String,
    /// Plugin description
    #[serde(default)]
    pub description: String,
    /// Discriminators of the events this plugin handles
    #[serde(default)]
    pub events: Vec<String>,
    /// Plugin author
    pub author: Option<String>,
    /// Plugin homepage
    pub homepage: Option<String>,
}

impl PluginManifest {
    /// Create a new plugin manifest
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        PluginManifest {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an event kind the plugin handles
    pub fn with_event(mut self, kind: EventKind) -> Self {
        self.events.push(kind.as_str().to_string());
        self
    }

    /// Add several event kinds
    pub fn with_events(mut self, kinds: &[EventKind]) -> Self {
        self.events
            .extend(kinds.iter().map(|kind| kind.as_str().to_string()));
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Whether the manifest lists `kind`
    pub fn handles(&self, kind: EventKind) -> bool {
        self.events.iter().any(|event| event == kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_manifest_builder() {
        let manifest = PluginManifest::new("echo", "Echo", "1.0.0")
            .with_event(EventKind::GroupMessage)
            .with_events(&[EventKind::FriendMessage, EventKind::TempMessage]);

        assert_eq!(manifest.id, "echo");
        assert_eq!(
            manifest.events,
            vec!["GroupMessage", "FriendMessage", "TempMessage"]
        );
        assert!(manifest.handles(EventKind::FriendMessage));
        assert!(!manifest.handles(EventKind::BotOnline));
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest: PluginManifest = serde_json::from_str(
            r#"{"id":"x","name":"X","version":"0.1.0","events":["MemberJoinEvent"]}"#,
        )
        .unwrap();
        assert!(manifest.handles(EventKind::MemberJoin));
        assert!(manifest.description.is_empty());
    }
}
