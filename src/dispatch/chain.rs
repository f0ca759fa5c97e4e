//! The dispatch chain

use std::sync::Arc;

use super::subscribers::SubscriptionId;
use super::EventHandler;
use crate::error::Result;
use crate::events::Event;
use crate::plugin_sdk::RegisteredPlugin;
use crate::session::MiraiSession;

/// Who consumed an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The plugin with this id returned `true`
    Plugin(String),
    /// The subscriber with this id returned `true`
    Subscriber(SubscriptionId),
    /// Everybody returned `false`
    Unhandled,
}

/// Deliver one event
///
/// Plugins that handle the event's kind run first, in order; then the
/// subscribers of that kind. The first `Ok(true)` stops the chain. An `Err`
/// stops it too and is returned.
pub async fn run_chain(
    session: &MiraiSession,
    plugins: &[RegisteredPlugin],
    subscribers: &[(SubscriptionId, EventHandler)],
    event: Arc<Event>,
) -> Result<Delivery> {
    let kind = event.kind();

    for entry in plugins {
        if !entry.plugin.handles(kind) {
            continue;
        }
        if entry.plugin.handle(session, &event).await? {
            return Ok(Delivery::Plugin(entry.manifest.id.clone()));
        }
    }

    for (id, handler) in subscribers {
        if handler(session.clone(), event.clone()).await? {
            return Ok(Delivery::Subscriber(*id));
        }
    }

    Ok(Delivery::Unhandled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::events::{decode_event, EventKind};
    use crate::plugin_sdk::{Plugin, PluginManifest, PluginRegistry};
    use crate::dispatch::SubscriberRegistry;
    use async_trait::async_trait;
    use futures::FutureExt;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        id: &'static str,
        consume: bool,
        kind: EventKind,
        log: Log,
    }

    #[async_trait]
    impl Plugin for Recorder {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new(self.id, self.id, "0.1.0").with_event(self.kind)
        }

        async fn handle(&self, _session: &MiraiSession, _event: &Event) -> Result<bool> {
            self.log.lock().push(self.id.to_string());
            Ok(self.consume)
        }
    }

    fn recorder(id: &'static str, consume: bool, log: &Log) -> Arc<dyn Plugin> {
        Arc::new(Recorder {
            id,
            consume,
            kind: EventKind::GroupMessage,
            log: log.clone(),
        })
    }

    fn subscriber(name: &'static str, consume: bool, log: &Log) -> EventHandler {
        let log = log.clone();
        Arc::new(move |_: MiraiSession, _: Arc<Event>| {
            log.lock().push(name.to_string());
            async move { Ok::<_, Error>(consume) }.boxed()
        })
    }

    fn group_message() -> Arc<Event> {
        Arc::new(
            decode_event(
                r#"{"type":"GroupMessage","messageChain":[],"sender":{"id":1,"memberName":"m",
                "permission":"MEMBER","group":{"id":2,"name":"g","permission":"MEMBER"}}}"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_plugin_short_circuits_rest_of_chain() {
        let log: Log = Arc::default();
        let session = MiraiSession::with_http_client(reqwest::Client::new());

        let plugins = PluginRegistry::new();
        plugins.register(recorder("first", false, &log)).unwrap();
        plugins.register(recorder("second", true, &log)).unwrap();
        plugins.register(recorder("third", false, &log)).unwrap();

        let subscribers = SubscriberRegistry::new();
        subscribers.subscribe(EventKind::GroupMessage, subscriber("sub", false, &log));

        let delivery = run_chain(
            &session,
            &plugins.snapshot(),
            &subscribers.snapshot(EventKind::GroupMessage),
            group_message(),
        )
        .await
        .unwrap();

        assert_eq!(delivery, Delivery::Plugin("second".into()));
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_subscribers_run_in_order_after_plugins() {
        let log: Log = Arc::default();
        let session = MiraiSession::with_http_client(reqwest::Client::new());

        let plugins = PluginRegistry::new();
        plugins.register(recorder("plugin", false, &log)).unwrap();
        plugins
            .register(Arc::new(Recorder {
                id: "elsewhere",
                consume: true,
                kind: EventKind::FriendMessage,
                log: log.clone(),
            }))
            .unwrap();

        let subscribers = SubscriberRegistry::new();
        subscribers.subscribe(EventKind::GroupMessage, subscriber("a", false, &log));
        let b = subscribers.subscribe(EventKind::GroupMessage, subscriber("b", true, &log));
        subscribers.subscribe(EventKind::GroupMessage, subscriber("c", false, &log));

        let delivery = run_chain(
            &session,
            &plugins.snapshot(),
            &subscribers.snapshot(EventKind::GroupMessage),
            group_message(),
        )
        .await
        .unwrap();

        assert_eq!(delivery, Delivery::Subscriber(b));
        assert_eq!(*log.lock(), vec!["plugin", "a", "b"]);
    }

    #[tokio::test]
    async fn test_handler_error_stops_chain() {
        let log: Log = Arc::default();
        let session = MiraiSession::with_http_client(reqwest::Client::new());

        let subscribers = SubscriberRegistry::new();
        subscribers.subscribe(
            EventKind::GroupMessage,
            Arc::new(|_: MiraiSession, _: Arc<Event>| {
                async { Err::<bool, _>(Error::BotMuted) }.boxed()
            }),
        );
        subscribers.subscribe(EventKind::GroupMessage, subscriber("after", true, &log));

        let result = run_chain(
            &session,
            &[],
            &subscribers.snapshot(EventKind::GroupMessage),
            group_message(),
        )
        .await;

        assert!(matches!(result, Err(Error::BotMuted)));
        assert!(log.lock().is_empty());
    }
}
