//! Session client
//!
//! [`MiraiSession`] owns at most one authenticated session against the
//! gateway. `connect` runs the handshake and starts the stream listeners;
//! `release` and `dispose` tear the session down exactly once no matter how
//! many callers race them. Remote operations live in `api/`.

mod api;
mod capability;
mod listener;
mod relay;
mod slot;
mod state;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use futures::FutureExt;
use secrecy::ExposeSecret;
use serde_json::json;
use tokio::sync::{mpsc, OnceCell};
use tracing::{debug, info, warn};

pub use api::{
    FriendRequestAction, GroupConfig, GroupRequestAction, MemberProfile, RequestRef,
    SessionConfig, UploadTarget, UploadedImage, UploadedVoice, DEFAULT_KICK_MESSAGE,
};
pub use capability::{ApiVersion, Capabilities, ImageUploadProtocol};
pub use relay::ImageRelay;
pub use state::SessionState;

use self::listener::{spawn_listener, StreamKind};
use self::slot::SessionSlot;
use self::state::ActiveSession;
use crate::config::{ClientConfig, RelayConfig, SessionOptions};
use crate::dispatch::{
    panic_message, DisconnectedHandler, DispatchFailure, DispatchSupervisor, EventHandler,
    SubscriberRegistry, SubscriptionId,
};
use crate::error::{Error, Result};
use crate::events::{Event, EventKind, StreamConnector, WebSocketConnector};
use crate::plugin_sdk::{Plugin, PluginRegistry};
use crate::rpc::{Envelope, RpcInvoker};

/// Client for one mirai-api-http style gateway
///
/// Cheap to clone; clones share the session, plugins and subscribers.
#[derive(Clone)]
pub struct MiraiSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    http: reqwest::Client,
    connector: Arc<dyn StreamConnector>,
    slot: SessionSlot,
    plugins: PluginRegistry,
    subscribers: SubscriberRegistry,
    supervisor: DispatchSupervisor,
    relay_config: RelayConfig,
    relay: OnceCell<ImageRelay>,
    disposed: AtomicBool,
    retired: AtomicBool,
}

/// Non-owning handle held by the stream listeners
#[derive(Clone)]
pub(crate) struct WeakSession {
    inner: Weak<SessionInner>,
}

impl WeakSession {
    pub(crate) fn upgrade(&self) -> Option<MiraiSession> {
        self.inner.upgrade().map(|inner| MiraiSession { inner })
    }
}

impl MiraiSession {
    /// Create a client with an HTTP client built from `config.http`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::build(
            config.http.build_client()?,
            Arc::new(WebSocketConnector),
            config.relay.clone(),
        ))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self::with_transport(http, Arc::new(WebSocketConnector))
    }

    /// Create a client with a custom stream connector
    pub fn with_transport(http: reqwest::Client, connector: Arc<dyn StreamConnector>) -> Self {
        Self::build(http, connector, RelayConfig::default())
    }

    fn build(
        http: reqwest::Client,
        connector: Arc<dyn StreamConnector>,
        relay_config: RelayConfig,
    ) -> Self {
        MiraiSession {
            inner: Arc::new(SessionInner {
                http,
                connector,
                slot: SessionSlot::default(),
                plugins: PluginRegistry::new(),
                subscribers: SubscriberRegistry::new(),
                supervisor: DispatchSupervisor::new(),
                relay_config,
                relay: OnceCell::new(),
                disposed: AtomicBool::new(false),
                retired: AtomicBool::new(false),
            }),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Authenticate, bind `account_id` and start listening for events
    ///
    /// Only one session may be installed at a time; a call made while
    /// another connect or a live session holds the slot fails immediately
    /// with [`Error::AlreadyConnected`]. When any handshake step fails the
    /// partial session is removed and released in the background.
    pub async fn connect(
        &self,
        options: SessionOptions,
        account_id: i64,
        listen_commands: bool,
    ) -> Result<()> {
        self.ensure_not_disposed()?;

        let rpc = RpcInvoker::new(self.inner.http.clone(), options);
        let active = Arc::new(ActiveSession::new(rpc, account_id));
        if !self.inner.slot.try_install(active.clone()) {
            return Err(Error::AlreadyConnected);
        }

        let outcome = match self.handshake(&active).await {
            Ok(()) if active.cancel.is_cancelled() => Err(Error::Cancelled),
            other => other,
        };

        match outcome {
            Ok(()) => {
                active.set_state(SessionState::Connected);
                info!(
                    "Session connected: account {} on {} (gateway {})",
                    account_id,
                    active.options().base_url(),
                    active.version().map(|v| v.to_string()).unwrap_or_default()
                );

                spawn_listener(self, active.clone(), StreamKind::Events);
                if listen_commands {
                    spawn_listener(self, active, StreamKind::Commands);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Connect failed: {}", e);
                if self.inner.slot.remove_if(&active) {
                    tokio::spawn(async move {
                        if let Err(e) = retire(&active).await {
                            debug!("Release after failed connect: {}", e);
                        }
                    });
                }
                Err(e)
            }
        }
    }

    /// Connect with the session settings in `config`
    pub async fn connect_with(&self, config: &ClientConfig) -> Result<()> {
        self.connect(
            config.session.clone(),
            config.account_id,
            config.listen_commands,
        )
        .await
    }

    async fn handshake(&self, active: &ActiveSession) -> Result<()> {
        let rpc = &active.rpc;

        let key: String = active
            .guard(async {
                let body = json!({ "authKey": rpc.options().auth_key.expose_secret() });
                rpc.post_json("auth", &body).await?.into_field("session")
            })
            .await?;
        active.set_session_key(key.clone());

        active
            .guard(async {
                let body = json!({ "sessionKey": key, "qq": active.account_id });
                rpc.post_json("verify", &body).await?.into_status()
            })
            .await?;

        let version = active.guard(rpc.about()).await?;
        active.set_version(version);

        let config: SessionConfig = active
            .guard(async {
                rpc.get("config", &[("sessionKey", key.clone())])
                    .await?
                    .into_payload()
            })
            .await?;

        if config.enable_websocket != Some(true) {
            let update = SessionConfig {
                cache_size: config.cache_size,
                enable_websocket: Some(true),
            };
            let mut body = serde_json::to_value(update)?;
            body["sessionKey"] = json!(key);

            active
                .guard(async { rpc.post_json("config", &body).await?.into_status() })
                .await?;
        }

        Ok(())
    }

    /// End the current session
    ///
    /// The first call cancels the stream listeners and in-flight calls and
    /// sends `/release`; its error, if any, is returned. Later calls, and
    /// calls with no session, return `Ok(())` without touching the network.
    pub async fn release(&self) -> Result<()> {
        let Some(active) = self.inner.slot.take() else {
            return Ok(());
        };
        self.inner.retired.store(true, Ordering::SeqCst);

        info!("Releasing session for account {}", active.account_id);
        retire(&active).await
    }

    /// Release the session and drop every plugin and subscriber
    ///
    /// The client refuses further use with [`Error::Disposed`].
    pub async fn dispose(&self) -> Result<()> {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.inner.subscribers.clear();
        self.inner.plugins.clear();
        if let Some(relay) = self.inner.relay.get() {
            relay.shutdown();
        }
        self.release().await
    }

    pub(crate) async fn on_stream_failure(
        &self,
        active: Arc<ActiveSession>,
        kind: StreamKind,
        error: Error,
    ) {
        warn!("{} stream failed: {}", kind, error);

        if !self.inner.slot.remove_if(&active) {
            return;
        }
        self.inner.retired.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            if let Err(e) = retire(&active).await {
                warn!("Release after stream failure: {}", e);
            }
        });

        let error = Arc::new(error);
        for (_, handler) in self.inner.subscribers.disconnected_snapshot().iter() {
            let notified = AssertUnwindSafe(async { handler(self.clone(), error.clone()).await })
                .catch_unwind()
                .await;
            match notified {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Disconnect handler failed: {}", e),
                Err(panic) => debug!("Disconnect handler panicked: {}", panic_message(panic.as_ref())),
            }
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn state(&self) -> SessionState {
        match self.inner.slot.current() {
            Some(active) => active.state(),
            None if self.inner.retired.load(Ordering::SeqCst) => SessionState::Released,
            None => SessionState::Idle,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Account bound to the connected session
    pub fn account_id(&self) -> Option<i64> {
        self.active().ok().map(|active| active.account_id)
    }

    /// Gateway version negotiated at connect
    pub fn api_version(&self) -> Option<ApiVersion> {
        self.active().ok().and_then(|active| active.version())
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.active().ok().and_then(|active| active.capabilities())
    }

    fn ensure_not_disposed(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::Disposed);
        }
        Ok(())
    }

    /// The connected session, or why there is none
    pub(crate) fn active(&self) -> Result<Arc<ActiveSession>> {
        self.ensure_not_disposed()?;
        match self.inner.slot.current() {
            Some(active) if active.state() == SessionState::Connected => Ok(active),
            _ => Err(Error::NotConnected),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakSession {
        WeakSession {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn connector(&self) -> Arc<dyn StreamConnector> {
        self.inner.connector.clone()
    }

    pub(crate) fn supervisor(&self) -> &DispatchSupervisor {
        &self.inner.supervisor
    }

    /// The image relay, started on first use
    pub(crate) async fn image_relay(&self) -> Result<&ImageRelay> {
        self.inner
            .relay
            .get_or_try_init(|| ImageRelay::bind(&self.inner.relay_config))
            .await
    }

    // ========================================================================
    // Plugins and subscribers
    // ========================================================================

    pub fn plugins(&self) -> &PluginRegistry {
        &self.inner.plugins
    }

    /// Append a plugin to the dispatch chain
    pub fn add_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<()> {
        self.ensure_not_disposed()?;
        self.inner.plugins.register(plugin)
    }

    /// Remove a plugin by id
    pub fn remove_plugin(&self, id: &str) -> Result<bool> {
        self.ensure_not_disposed()?;
        self.inner.plugins.unregister(id)
    }

    pub fn subscribers(&self) -> &SubscriberRegistry {
        &self.inner.subscribers
    }

    /// Subscribe to events of one kind; return `Ok(true)` to consume
    pub fn subscribe<F, Fut>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(MiraiSession, Arc<Event>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        let boxed: EventHandler =
            Arc::new(move |session: MiraiSession, event: Arc<Event>| handler(session, event).boxed());
        self.inner.subscribers.subscribe(kind, boxed)
    }

    /// Get told when a stream fails and the session is torn down
    pub fn on_disconnected<F, Fut>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(MiraiSession, Arc<Error>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let boxed: DisconnectedHandler =
            Arc::new(move |session: MiraiSession, error: Arc<Error>| handler(session, error).boxed());
        self.inner.subscribers.on_disconnected(boxed)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.unsubscribe(id)
    }

    /// Receiver for failed dispatches; only the first call gets it
    ///
    /// Until it is taken, failures are logged instead.
    pub fn dispatch_failures(&self) -> Option<mpsc::UnboundedReceiver<DispatchFailure>> {
        self.inner.supervisor.take_receiver()
    }
}

/// Cancel a session's work and release it on the gateway
async fn retire(active: &ActiveSession) -> Result<()> {
    active.set_state(SessionState::Releasing);
    active.cancel.cancel();

    let result = match active.session_key() {
        Ok(key) => {
            let body = json!({ "sessionKey": key, "qq": active.account_id });
            active
                .rpc
                .post_json("release", &body)
                .await
                .and_then(Envelope::into_status)
        }
        Err(_) => Ok(()),
    };

    active.set_state(SessionState::Released);
    result
}
