//! The client's session slot

use std::sync::Arc;

use parking_lot::Mutex;

use super::state::ActiveSession;

/// Holds at most one session; every mutation is a compare-and-set or a take
#[derive(Default)]
pub(crate) struct SessionSlot {
    current: Mutex<Option<Arc<ActiveSession>>>,
}

impl SessionSlot {
    /// Install `session` if the slot is empty
    pub(crate) fn try_install(&self, session: Arc<ActiveSession>) -> bool {
        let mut current = self.current.lock();
        if current.is_some() {
            return false;
        }
        *current = Some(session);
        true
    }

    /// Empty the slot if it still holds `session`
    pub(crate) fn remove_if(&self, session: &Arc<ActiveSession>) -> bool {
        let mut current = self.current.lock();
        match current.as_ref() {
            Some(installed) if Arc::ptr_eq(installed, session) => {
                *current = None;
                true
            }
            _ => false,
        }
    }

    /// Empty the slot, returning what it held
    pub(crate) fn take(&self) -> Option<Arc<ActiveSession>> {
        self.current.lock().take()
    }

    pub(crate) fn current(&self) -> Option<Arc<ActiveSession>> {
        self.current.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionOptions;
    use crate::rpc::RpcInvoker;

    fn session() -> Arc<ActiveSession> {
        let rpc = RpcInvoker::new(
            reqwest::Client::new(),
            SessionOptions::new("127.0.0.1", 8080, "key"),
        );
        Arc::new(ActiveSession::new(rpc, 1))
    }

    #[test]
    fn test_single_install() {
        let slot = SessionSlot::default();
        let a = session();
        let b = session();

        assert!(slot.try_install(a.clone()));
        assert!(!slot.try_install(b.clone()));
        assert!(Arc::ptr_eq(&slot.current().unwrap(), &a));
    }

    #[test]
    fn test_remove_if_only_removes_the_same_session() {
        let slot = SessionSlot::default();
        let a = session();
        let b = session();
        slot.try_install(a.clone());

        assert!(!slot.remove_if(&b));
        assert!(slot.current().is_some());
        assert!(slot.remove_if(&a));
        assert!(slot.take().is_none());
    }
}
