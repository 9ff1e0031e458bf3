//! View-models behind the journal pages.
//!
//! Everything here is plain state plus async operations over an
//! [`EntryStore`](crate::store::EntryStore); the reactive wiring lives in
//! `crate::state`.

pub mod day;
pub mod important;
pub mod repository;
pub mod search;

use crate::error::{JournalError, StoreResult};
use crate::store::Subscription;
use futures::StreamExt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No user yet.
    #[default]
    Uninitialized,
    Loading,
    Ready,
    /// The live channel failed. Terminal for the current key.
    Errored,
}

/// A live list bound to one key (user plus date, user plus type, ...).
///
/// Snapshots carry the key they were requested for; a snapshot for any other
/// key is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveList<K, T> {
    pub key: Option<K>,
    pub phase: Phase,
    pub items: Vec<T>,
    pub error: Option<JournalError>,
}

impl<K, T> Default for LiveList<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            phase: Phase::Uninitialized,
            items: Vec::new(),
            error: None,
        }
    }
}

impl<K: PartialEq + std::fmt::Debug, T> LiveList<K, T> {
    /// Starts over for `key`. A missing key leaves the list uninitialized.
    pub fn begin(&mut self, key: Option<K>) {
        self.phase = if key.is_some() {
            Phase::Loading
        } else {
            Phase::Uninitialized
        };
        self.key = key;
        self.items.clear();
        self.error = None;
    }

    pub fn is_current(&self, key: &K) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Folds one subscription item in. Returns false if it was ignored.
    pub fn apply(&mut self, key: &K, item: StoreResult<Vec<T>>) -> bool {
        if !self.is_current(key) || self.phase == Phase::Errored {
            return false;
        }
        match item {
            Ok(items) => {
                self.items = items;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                log::error!("live list {key:?} failed: {e}");
                self.phase = Phase::Errored;
                self.error = Some(JournalError::Subscription(e));
            }
        }
        true
    }

    /// Stores a non-fatal error unless a channel failure is already shown.
    pub fn record_error(&mut self, error: JournalError) {
        log::error!("{error}");
        if !self.error.as_ref().is_some_and(|e| e.is_subscription()) {
            self.error = Some(error);
        }
    }

    pub fn clear_error(&mut self) {
        if self.phase != Phase::Errored {
            self.error = None;
        }
    }
}

/// Feeds a subscription into `apply` until it ends or `apply` declines.
pub async fn pump<T>(mut sub: Subscription<T>, mut apply: impl FnMut(StoreResult<T>) -> bool) {
    while let Some(item) = sub.next().await {
        let terminal = item.is_err();
        if !apply(item) || terminal {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::channel;
    use futures::executor::block_on;

    #[test]
    fn test_live_list_phases() {
        let mut list: LiveList<u32, &str> = LiveList::default();
        assert_eq!(list.phase, Phase::Uninitialized);

        list.begin(Some(1));
        assert_eq!(list.phase, Phase::Loading);
        assert!(list.apply(&1, Ok(vec!["a"])));
        assert_eq!(list.phase, Phase::Ready);
        assert!(list.apply(&1, Ok(vec!["a", "b"])));
        assert_eq!(list.items, vec!["a", "b"]);

        assert!(list.apply(&1, Err(StoreError::permission_denied())));
        assert_eq!(list.phase, Phase::Errored);
        assert!(!list.apply(&1, Ok(vec![])));
        assert_eq!(list.items, vec!["a", "b"]);
    }

    #[test]
    fn test_superseded_key_is_ignored() {
        let mut list: LiveList<u32, &str> = LiveList::default();
        list.begin(Some(1));
        list.begin(Some(2));
        assert!(!list.apply(&1, Ok(vec!["stale"])));
        assert_eq!(list.phase, Phase::Loading);
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_begin_without_key_stays_uninitialized() {
        let mut list: LiveList<u32, u8> = LiveList::default();
        list.begin(None);
        assert_eq!(list.phase, Phase::Uninitialized);
    }

    #[test]
    fn test_write_error_does_not_hide_channel_error() {
        let mut list: LiveList<u32, u8> = LiveList::default();
        list.begin(Some(1));
        list.apply(&1, Err(StoreError::network("offline")));
        list.record_error(JournalError::Write(StoreError::permission_denied()));
        assert!(list.error.as_ref().is_some_and(|e| e.is_subscription()));
    }

    #[test]
    fn test_pump_stops_after_error() {
        let (tx, sub) = channel::<u32>();
        tx.send(1);
        tx.send(2);
        tx.fail(StoreError::network("gone"));
        let mut seen = Vec::new();
        block_on(pump(sub, |item| {
            seen.push(item.is_ok());
            true
        }));
        assert_eq!(seen, vec![true, true, false]);
    }
}
