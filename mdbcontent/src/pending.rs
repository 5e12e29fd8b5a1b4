//! Explicit lifecycle for optimistic removals
//!
//! Deleting a remote file is not instant from the reader's point of view:
//! the UI wants the item gone immediately, but the store may still list it
//! until the backing repository catches up, and the delete itself can fail.
//! [`TrackedList`] keeps every item in one of three states instead of
//! silently patching the visible list, so a failed delete can be reverted
//! and a reconcile with a fresh listing resolves the rest.

use std::collections::HashMap;

/// Items tracked by [`TrackedList`] expose a stable key
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Lifecycle of an item under optimistic deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Present remotely, nothing in flight
    Committed,
    /// Delete requested locally, not yet confirmed remotely
    PendingDelete,
    /// Delete failed, item is being restored to view
    Reverting,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    state: EntryState,
}

/// A list whose removals are tracked explicitly
#[derive(Debug, Clone)]
pub struct TrackedList<T: Keyed> {
    entries: Vec<Entry<T>>,
}

impl<T: Keyed> Default for TrackedList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Keyed + Clone> TrackedList<T> {
    /// Builds a list of committed entries from a fresh listing
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            entries: items
                .into_iter()
                .map(|item| Entry {
                    item,
                    state: EntryState::Committed,
                })
                .collect(),
        }
    }

    /// Items a reader should see: everything not pending deletion
    pub fn visible(&self) -> Vec<T> {
        self.entries
            .iter()
            .filter(|e| e.state != EntryState::PendingDelete)
            .map(|e| e.item.clone())
            .collect()
    }

    /// State of the entry with the given key, if tracked
    pub fn state_of(&self, key: &str) -> Option<EntryState> {
        self.entries
            .iter()
            .find(|e| e.item.key() == key)
            .map(|e| e.state)
    }

    /// Marks an entry as pending deletion, hiding it from [`visible`]
    ///
    /// Returns false when the key is unknown or a delete is already in
    /// flight for it.
    ///
    /// [`visible`]: TrackedList::visible
    pub fn mark_pending(&mut self, key: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.item.key() == key && e.state == EntryState::Committed)
        {
            Some(entry) => {
                entry.state = EntryState::PendingDelete;
                true
            }
            None => false,
        }
    }

    /// Confirms a pending delete: the entry is dropped for good
    pub fn confirm(&mut self, key: &str) {
        self.entries
            .retain(|e| !(e.item.key() == key && e.state == EntryState::PendingDelete));
    }

    /// Reverts a failed delete: the entry becomes visible again
    pub fn revert(&mut self, key: &str) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.item.key() == key && e.state == EntryState::PendingDelete)
        {
            entry.state = EntryState::Reverting;
        }
    }

    /// Folds a fresh listing into the tracked state
    ///
    /// Committed and reverting entries are replaced by the fresh listing
    /// (reverting ones settle back to committed). Pending deletes whose key
    /// is absent from the fresh listing are confirmed; ones still present
    /// remain hidden until confirm or revert decides their fate.
    pub fn reconcile(&mut self, fresh: Vec<T>) {
        let pending: HashMap<String, T> = self
            .entries
            .drain(..)
            .filter(|e| e.state == EntryState::PendingDelete)
            .map(|e| (e.item.key().to_string(), e.item))
            .collect();

        for item in fresh {
            let state = if pending.contains_key(item.key()) {
                EntryState::PendingDelete
            } else {
                EntryState::Committed
            };
            self.entries.push(Entry { item, state });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(String);

    impl Keyed for Item {
        fn key(&self) -> &str {
            &self.0
        }
    }

    fn items(keys: &[&str]) -> Vec<Item> {
        keys.iter().map(|k| Item(k.to_string())).collect()
    }

    #[test]
    fn test_mark_pending_hides_entry() {
        let mut list = TrackedList::from_items(items(&["a", "b", "c"]));
        assert!(list.mark_pending("b"));
        let visible: Vec<_> = list.visible().iter().map(|i| i.0.clone()).collect();
        assert_eq!(visible, vec!["a", "c"]);
        assert_eq!(list.state_of("b"), Some(EntryState::PendingDelete));
    }

    #[test]
    fn test_mark_pending_unknown_key() {
        let mut list = TrackedList::from_items(items(&["a"]));
        assert!(!list.mark_pending("zzz"));
    }

    #[test]
    fn test_double_mark_is_rejected() {
        let mut list = TrackedList::from_items(items(&["a"]));
        assert!(list.mark_pending("a"));
        assert!(!list.mark_pending("a"));
    }

    #[test]
    fn test_confirm_drops_entry() {
        let mut list = TrackedList::from_items(items(&["a", "b"]));
        list.mark_pending("a");
        list.confirm("a");
        assert_eq!(list.state_of("a"), None);
        assert_eq!(list.visible().len(), 1);
    }

    #[test]
    fn test_revert_restores_entry() {
        let mut list = TrackedList::from_items(items(&["a", "b"]));
        list.mark_pending("a");
        list.revert("a");
        assert_eq!(list.state_of("a"), Some(EntryState::Reverting));
        assert_eq!(list.visible().len(), 2);
    }

    #[test]
    fn test_reconcile_confirms_absent_pending() {
        let mut list = TrackedList::from_items(items(&["a", "b"]));
        list.mark_pending("a");
        list.reconcile(items(&["b"]));
        assert_eq!(list.state_of("a"), None);
        assert_eq!(list.state_of("b"), Some(EntryState::Committed));
    }

    #[test]
    fn test_reconcile_keeps_pending_still_listed() {
        let mut list = TrackedList::from_items(items(&["a", "b"]));
        list.mark_pending("a");
        // Fresh listing still contains the file: the store has not caught
        // up yet, the entry stays hidden.
        list.reconcile(items(&["a", "b"]));
        assert_eq!(list.state_of("a"), Some(EntryState::PendingDelete));
        let visible: Vec<_> = list.visible().iter().map(|i| i.0.clone()).collect();
        assert_eq!(visible, vec!["b"]);
    }

    #[test]
    fn test_reconcile_settles_reverting() {
        let mut list = TrackedList::from_items(items(&["a"]));
        list.mark_pending("a");
        list.revert("a");
        list.reconcile(items(&["a"]));
        assert_eq!(list.state_of("a"), Some(EntryState::Committed));
    }
}
