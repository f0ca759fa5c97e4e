//! Supervision of detached dispatch tasks

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::error;

use crate::error::Error;
use crate::events::EventKind;

/// Why a dispatch ended early
#[derive(Debug)]
pub enum FailureCause {
    /// A plugin or subscriber returned an error
    Handler(Error),
    /// A plugin or subscriber panicked
    Panic(String),
}

/// A dispatch that did not complete
#[derive(Debug)]
pub struct DispatchFailure {
    pub kind: EventKind,
    pub cause: FailureCause,
}

/// Routes dispatch failures to whoever took the receiver, or to the log
pub struct DispatchSupervisor {
    tx: mpsc::UnboundedSender<DispatchFailure>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DispatchFailure>>>,
}

impl DispatchSupervisor {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        DispatchSupervisor {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Take the failure receiver; only the first call gets it
    pub fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<DispatchFailure>> {
        self.rx.lock().take()
    }

    pub fn report(&self, failure: DispatchFailure) {
        if self.rx.lock().is_some() {
            log_failure(&failure);
            return;
        }
        if let Err(mpsc::error::SendError(failure)) = self.tx.send(failure) {
            log_failure(&failure);
        }
    }
}

impl Default for DispatchSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

fn log_failure(failure: &DispatchFailure) {
    match &failure.cause {
        FailureCause::Handler(e) => error!("{} handler failed: {}", failure.kind, e),
        FailureCause::Panic(msg) => error!("{} handler panicked: {}", failure.kind, msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_reach_taken_receiver() {
        let supervisor = DispatchSupervisor::new();
        let mut rx = supervisor.take_receiver().unwrap();
        assert!(supervisor.take_receiver().is_none());

        supervisor.report(DispatchFailure {
            kind: EventKind::GroupMessage,
            cause: FailureCause::Panic("boom".into()),
        });

        let failure = rx.try_recv().unwrap();
        assert_eq!(failure.kind, EventKind::GroupMessage);
        assert!(matches!(failure.cause, FailureCause::Panic(ref m) if m == "boom"));
    }

    #[test]
    fn test_report_wakes_waiting_receiver() {
        let supervisor = DispatchSupervisor::new();
        let mut rx = supervisor.take_receiver().unwrap();
        let mut recv = tokio_test::task::spawn(rx.recv());
        tokio_test::assert_pending!(recv.poll());

        supervisor.report(DispatchFailure {
            kind: EventKind::BotOnline,
            cause: FailureCause::Handler(Error::PermissionDenied),
        });

        assert!(recv.is_woken());
        let failure = tokio_test::assert_ready!(recv.poll()).unwrap();
        assert_eq!(failure.kind, EventKind::BotOnline);
        assert!(matches!(failure.cause, FailureCause::Handler(Error::PermissionDenied)));
    }

    #[test]
    fn test_unclaimed_failures_are_logged_not_queued() {
        let supervisor = DispatchSupervisor::new();
        supervisor.report(DispatchFailure {
            kind: EventKind::Unknown,
            cause: FailureCause::Handler(Error::BotMuted),
        });

        let mut rx = supervisor.take_receiver().unwrap();
        assert!(rx.try_recv().is_err());
    }
}
