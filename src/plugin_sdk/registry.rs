//! Plugin registry - Ordered, copy-on-write plugin collection

use std::sync::Arc;

use super::manifest::PluginManifest;
use super::traits::Plugin;
use crate::dispatch::CowList;
use crate::error::{Error, Result};

/// A plugin together with the manifest it registered with
#[derive(Clone)]
pub struct RegisteredPlugin {
    pub manifest: PluginManifest,
    pub plugin: Arc<dyn Plugin>,
}

/// The ordered plugin chain
///
/// Dispatch iterates a [`snapshot`](PluginRegistry::snapshot); registering or
/// removing a plugin while a dispatch runs affects only later dispatches.
pub struct PluginRegistry {
    plugins: CowList<RegisteredPlugin>,
}

impl PluginRegistry {
    /// Create a new plugin registry
    pub fn new() -> Self {
        PluginRegistry {
            plugins: CowList::new(),
        }
    }

    /// Register a plugin at the end of the chain
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<()> {
        let manifest = plugin.manifest();
        let id = manifest.id.clone();

        self.plugins.update(|plugins| {
            if plugins.iter().any(|p| p.manifest.id == id) {
                return Err(Error::InvalidInput(format!(
                    "Plugin '{}' is already registered",
                    id
                )));
            }
            plugins.push(RegisteredPlugin { manifest, plugin });
            Ok(())
        })?;

        tracing::debug!("Plugin registered: {}", id);
        Ok(())
    }

    /// Unregister a plugin
    pub fn unregister(&self, id: &str) -> Result<bool> {
        match self.plugins.remove_first(|p| p.manifest.id == id) {
            Some(removed) => {
                removed.plugin.unregister()?;
                tracing::debug!("Plugin unregistered: {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Get a plugin by ID
    pub fn get(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins
            .snapshot()
            .iter()
            .find(|p| p.manifest.id == id)
            .map(|p| p.plugin.clone())
    }

    /// List all registered plugins, in chain order
    pub fn list(&self) -> Vec<PluginManifest> {
        self.plugins
            .snapshot()
            .iter()
            .map(|p| p.manifest.clone())
            .collect()
    }

    /// The current chain
    pub fn snapshot(&self) -> Arc<Vec<RegisteredPlugin>> {
        self.plugins.snapshot()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Remove every plugin without calling `unregister`
    pub fn clear(&self) {
        self.plugins.clear();
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventKind};
    use crate::session::MiraiSession;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Plugin for Named {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new(self.0, self.0, "1.0.0").with_event(EventKind::GroupMessage)
        }

        async fn handle(&self, _session: &MiraiSession, _event: &Event) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_plugin_registry_new() {
        let registry = PluginRegistry::new();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_register_keeps_order_and_rejects_duplicates() {
        let registry = PluginRegistry::new();
        registry.register(Arc::new(Named("a"))).unwrap();
        registry.register(Arc::new(Named("b"))).unwrap();

        let err = registry.register(Arc::new(Named("a"))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let ids: Vec<_> = registry.list().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unregister_leaves_old_snapshot_intact() {
        let registry = PluginRegistry::new();
        registry.register(Arc::new(Named("a"))).unwrap();
        registry.register(Arc::new(Named("b"))).unwrap();

        let snapshot = registry.snapshot();
        assert!(registry.unregister("a").unwrap());
        assert!(!registry.unregister("a").unwrap());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("a").is_none());
        assert!(registry.get("b").is_some());
    }
}
