//! Event ingestion loops
//!
//! One task per stream. A loop reads fragments, reassembles frames, decodes
//! them and hands each event to its own dispatch task without waiting for it.
//! Cancellation of the session token ends the loop quietly; any other exit
//! tears the session down and notifies the disconnect subscribers.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::state::ActiveSession;
use super::{MiraiSession, WeakSession};
use crate::dispatch::spawn_dispatch;
use crate::error::{Error, Result};
use crate::events::{decode_command, decode_event, FrameAssembler, StreamConnector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamKind {
    Events,
    Commands,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Events => f.write_str("event"),
            StreamKind::Commands => f.write_str("command"),
        }
    }
}

pub(crate) fn spawn_listener(
    session: &MiraiSession,
    active: Arc<ActiveSession>,
    kind: StreamKind,
) -> JoinHandle<()> {
    let weak = session.downgrade();
    let connector = session.connector();

    tokio::spawn(async move {
        let error = match listen(&weak, connector.as_ref(), &active, kind).await {
            Ok(()) => {
                debug!("{} stream stopped", kind);
                return;
            }
            Err(e) => e,
        };

        if active.cancel.is_cancelled() {
            debug!("{} stream ended during release: {}", kind, error);
            return;
        }

        if let Some(session) = weak.upgrade() {
            session.on_stream_failure(active, kind, error).await;
        }
    })
}

async fn listen(
    weak: &WeakSession,
    connector: &dyn StreamConnector,
    active: &ActiveSession,
    kind: StreamKind,
) -> Result<()> {
    let url = match kind {
        StreamKind::Events => active.options().events_url(active.session_key()?)?,
        StreamKind::Commands => active.options().commands_url()?,
    };

    let mut source = tokio::select! {
        biased;
        _ = active.cancel.cancelled() => return Ok(()),
        source = connector.connect(&url) => source?,
    };
    info!("{} stream open", kind);

    let mut assembler = FrameAssembler::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = active.cancel.cancelled() => return Ok(()),
            next = source.next_fragment() => next,
        };

        let fragment = match next {
            Some(fragment) => fragment?,
            None => {
                return Err(Error::WebSocket(format!(
                    "{} stream closed by gateway",
                    kind
                )))
            }
        };

        let Some(frame) = assembler.push(fragment) else {
            continue;
        };

        let text = String::from_utf8(frame)
            .map_err(|e| Error::Protocol(format!("frame is not UTF-8: {}", e)))?;

        let event = match kind {
            StreamKind::Events => decode_event(&text)?,
            StreamKind::Commands => decode_command(&text)?,
        };
        debug!("{} frame: {}", kind, event.kind());

        match weak.upgrade() {
            Some(session) => {
                spawn_dispatch(session, event);
            }
            None => return Ok(()),
        }
    }
}
