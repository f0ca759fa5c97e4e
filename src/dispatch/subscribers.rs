//! Per-kind subscriber lists

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::cow::CowList;
use super::{DisconnectedHandler, EventHandler};
use crate::events::EventKind;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered handler lists, one per [`EventKind`], plus the disconnect list
pub struct SubscriberRegistry {
    next_id: AtomicU64,
    channels: HashMap<EventKind, CowList<(SubscriptionId, EventHandler)>>,
    disconnected: CowList<(SubscriptionId, DisconnectedHandler)>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        SubscriberRegistry {
            next_id: AtomicU64::new(1),
            channels: EventKind::ALL
                .iter()
                .map(|kind| (*kind, CowList::new()))
                .collect(),
            disconnected: CowList::new(),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn channel(&self, kind: EventKind) -> &CowList<(SubscriptionId, EventHandler)> {
        // every kind is inserted at construction
        &self.channels[&kind]
    }

    /// Append a handler to the channel for `kind`
    pub fn subscribe(&self, kind: EventKind, handler: EventHandler) -> SubscriptionId {
        let id = self.next_id();
        self.channel(kind).push((id, handler));
        id
    }

    /// Append a handler for stream failures
    pub fn on_disconnected(&self, handler: DisconnectedHandler) -> SubscriptionId {
        let id = self.next_id();
        self.disconnected.push((id, handler));
        id
    }

    /// Remove a handler from whichever list holds it
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.disconnected.remove_first(|(sid, _)| *sid == id).is_some() {
            return true;
        }
        self.channels
            .values()
            .any(|list| list.remove_first(|(sid, _)| *sid == id).is_some())
    }

    /// Handlers for `kind`, in subscription order
    pub fn snapshot(&self, kind: EventKind) -> Arc<Vec<(SubscriptionId, EventHandler)>> {
        self.channel(kind).snapshot()
    }

    pub fn disconnected_snapshot(&self) -> Arc<Vec<(SubscriptionId, DisconnectedHandler)>> {
        self.disconnected.snapshot()
    }

    /// Number of handlers subscribed to `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        self.channel(kind).len()
    }

    /// Drop every handler on every list
    pub fn clear(&self) {
        for list in self.channels.values() {
            list.clear();
        }
        self.disconnected.clear();
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::events::Event;
    use crate::session::MiraiSession;
    use futures::FutureExt;

    fn noop() -> EventHandler {
        Arc::new(|_: MiraiSession, _: Arc<Event>| async { Ok::<_, Error>(false) }.boxed())
    }

    fn on_drop() -> DisconnectedHandler {
        Arc::new(|_: MiraiSession, _: Arc<Error>| async { Ok::<_, Error>(()) }.boxed())
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let registry = SubscriberRegistry::new();
        let a = registry.subscribe(EventKind::GroupMessage, noop());
        let b = registry.subscribe(EventKind::GroupMessage, noop());
        registry.subscribe(EventKind::FriendMessage, noop());

        assert_eq!(registry.count(EventKind::GroupMessage), 2);
        assert!(registry.unsubscribe(a));
        assert!(!registry.unsubscribe(a));

        let remaining = registry.snapshot(EventKind::GroupMessage);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].0, b);
    }

    #[test]
    fn test_clear_empties_every_list() {
        let registry = SubscriberRegistry::new();
        registry.subscribe(EventKind::Unknown, noop());
        registry.on_disconnected(on_drop());

        registry.clear();

        assert_eq!(registry.count(EventKind::Unknown), 0);
        assert!(registry.disconnected_snapshot().is_empty());
    }
}
