//! Per-session state

use std::fmt;
use std::future::Future;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::capability::{ApiVersion, Capabilities};
use crate::config::SessionOptions;
use crate::error::{Error, Result};
use crate::rpc::RpcInvoker;

/// Lifecycle of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Connected,
    Releasing,
    Released,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Connecting => "connecting",
            SessionState::Connected => "connected",
            SessionState::Releasing => "releasing",
            SessionState::Released => "released",
        };
        f.write_str(name)
    }
}

/// One authenticated session against the gateway
///
/// Created by connect and installed in the client's slot. The session key,
/// version and capabilities are written once during the handshake.
pub(crate) struct ActiveSession {
    pub(crate) rpc: RpcInvoker,
    pub(crate) account_id: i64,
    pub(crate) cancel: CancellationToken,
    session_key: OnceLock<String>,
    version: OnceLock<ApiVersion>,
    capabilities: OnceLock<Capabilities>,
    state: Mutex<SessionState>,
}

impl ActiveSession {
    pub(crate) fn new(rpc: RpcInvoker, account_id: i64) -> Self {
        ActiveSession {
            rpc,
            account_id,
            cancel: CancellationToken::new(),
            session_key: OnceLock::new(),
            version: OnceLock::new(),
            capabilities: OnceLock::new(),
            state: Mutex::new(SessionState::Connecting),
        }
    }

    pub(crate) fn options(&self) -> &SessionOptions {
        self.rpc.options()
    }

    pub(crate) fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        *self.state.lock() = state;
    }

    pub(crate) fn session_key(&self) -> Result<&str> {
        self.session_key
            .get()
            .map(String::as_str)
            .ok_or(Error::NotConnected)
    }

    pub(crate) fn set_session_key(&self, key: String) {
        let _ = self.session_key.set(key);
    }

    pub(crate) fn version(&self) -> Option<ApiVersion> {
        self.version.get().copied()
    }

    pub(crate) fn capabilities(&self) -> Option<Capabilities> {
        self.capabilities.get().copied()
    }

    pub(crate) fn set_version(&self, version: ApiVersion) {
        let _ = self.version.set(version);
        let _ = self.capabilities.set(Capabilities::for_version(version));
    }

    /// Run `fut` unless the session is released first
    pub(crate) async fn guard<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            result = fut => result,
        }
    }
}
