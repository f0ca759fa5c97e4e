//! Copy-on-write list

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

/// An ordered list that readers snapshot and writers replace wholesale
///
/// Readers take the pointer lock only long enough to clone the current
/// `Arc`, then iterate the snapshot unlocked; a snapshot never changes under
/// them. Writers are serialised by their own mutex. The new list is built
/// outside the pointer lock and only the swap happens under it, so a reader
/// can wait at most for that swap.
pub struct CowList<T> {
    writer: Mutex<()>,
    current: RwLock<Arc<Vec<T>>>,
}

impl<T: Clone> CowList<T> {
    pub fn new() -> Self {
        CowList {
            writer: Mutex::new(()),
            current: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// The current list
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.current.read().clone()
    }

    /// Build a new list from the current one and publish it
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let _writer = self.writer.lock();

        let mut next = self.snapshot().as_ref().clone();
        let result = f(&mut next);
        *self.current.write() = Arc::new(next);

        result
    }

    pub fn push(&self, item: T) {
        self.update(|items| items.push(item));
    }

    /// Remove the first item matching `pred`
    pub fn remove_first(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.update(|items| {
            let index = items.iter().position(|item| pred(item))?;
            Some(items.remove(index))
        })
    }

    pub fn clear(&self) {
        let _writer = self.writer.lock();
        *self.current.write() = Arc::new(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for CowList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_stable_across_writes() {
        let list = CowList::new();
        list.push(1);
        list.push(2);

        let before = list.snapshot();
        list.push(3);
        assert_eq!(list.remove_first(|v| *v == 1), Some(1));

        assert_eq!(*before, vec![1, 2]);
        assert_eq!(*list.snapshot(), vec![2, 3]);
    }

    #[test]
    fn test_remove_missing_leaves_list() {
        let list = CowList::new();
        list.push("a");
        assert_eq!(list.remove_first(|v| *v == "b"), None);
        assert_eq!(list.len(), 1);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let list = Arc::new(CowList::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let list = list.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        list.push(t * 100 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(list.len(), 400);
    }
}
