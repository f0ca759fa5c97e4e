//! Event dispatch
//!
//! Every decoded event is delivered on its own task: plugins first, then the
//! subscribers of the event's kind, stopping at the first handler that
//! returns `Ok(true)`. The ingestion loop never waits for a dispatch, so a
//! slow handler delays nothing but itself. Errors and panics inside a
//! dispatch go to the [`DispatchSupervisor`].

mod chain;
mod cow;
mod subscribers;
mod supervisor;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::trace;

pub use chain::{run_chain, Delivery};
pub use cow::CowList;
pub use subscribers::{SubscriberRegistry, SubscriptionId};
pub use supervisor::{DispatchFailure, DispatchSupervisor, FailureCause};

use crate::error::{Error, Result};
use crate::events::Event;
use crate::session::MiraiSession;

/// Event handler: returns `Ok(true)` to consume the event
pub type EventHandler =
    Arc<dyn Fn(MiraiSession, Arc<Event>) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// Stream failure handler
pub type DisconnectedHandler =
    Arc<dyn Fn(MiraiSession, Arc<Error>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Deliver `event` on a new task
pub(crate) fn spawn_dispatch(session: MiraiSession, event: Event) -> JoinHandle<()> {
    let event = Arc::new(event);

    tokio::spawn(async move {
        let kind = event.kind();
        let plugins = session.plugins().snapshot();
        let subscribers = session.subscribers().snapshot(kind);

        let outcome = AssertUnwindSafe(run_chain(&session, &plugins, &subscribers, event))
            .catch_unwind()
            .await;

        let cause = match outcome {
            Ok(Ok(delivery)) => {
                trace!("{} delivered: {:?}", kind, delivery);
                return;
            }
            Ok(Err(e)) => FailureCause::Handler(e),
            Err(panic) => FailureCause::Panic(panic_message(panic.as_ref())),
        };

        session.supervisor().report(DispatchFailure { kind, cause });
    })
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
