use super::{channel, EntryQuery, EntryStore, SnapshotSender, Subscription};
use crate::error::{StoreError, StoreResult};
use crate::models::{DayMetadata, EntryPatch, JournalEntry, NewEntry};
use crate::util::DayKey;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-process store with the same query semantics as the hosted one.
///
/// Backs the local demo mode and the tests. Every write re-evaluates the open
/// subscriptions and pushes a fresh snapshot to those whose result changed.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: u64,
    /// user -> id -> entry
    entries: BTreeMap<String, BTreeMap<String, JournalEntry>>,
    /// user -> date -> day
    days: BTreeMap<String, BTreeMap<DayKey, DayMetadata>>,
    entry_watchers: Vec<EntryWatcher>,
    day_watchers: Vec<DayWatcher>,
    #[cfg(test)]
    failing_writes: Option<StoreError>,
}

struct EntryWatcher {
    user_id: String,
    query: EntryQuery,
    last: Vec<JournalEntry>,
    tx: SnapshotSender<Vec<JournalEntry>>,
}

struct DayWatcher {
    user_id: String,
    last: Vec<DayMetadata>,
    tx: SnapshotSender<Vec<DayMetadata>>,
}

impl MemoryInner {
    fn query_entries(&self, user_id: &str, query: &EntryQuery) -> Vec<JournalEntry> {
        match self.entries.get(user_id) {
            Some(m) => query.run(m.values()),
            None => vec![],
        }
    }

    fn important_days(&self, user_id: &str) -> Vec<DayMetadata> {
        self.days
            .get(user_id)
            .map(|m| m.values().filter(|d| d.is_important).cloned().collect())
            .unwrap_or_default()
    }

    fn user_entries(&mut self, user_id: &str) -> &mut BTreeMap<String, JournalEntry> {
        self.entries.entry(user_id.to_string()).or_default()
    }

    #[cfg(test)]
    fn check_write(&self) -> StoreResult<()> {
        match &self.failing_writes {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    #[cfg(not(test))]
    fn check_write(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Pushes changed snapshots and forgets closed subscribers.
    fn notify(&mut self) {
        let mut watchers = std::mem::take(&mut self.entry_watchers);
        watchers.retain_mut(|w| {
            if w.tx.is_closed() {
                return false;
            }
            let next = self.query_entries(&w.user_id, &w.query);
            if next == w.last {
                return true;
            }
            w.last = next.clone();
            w.tx.send(next)
        });
        self.entry_watchers = watchers;

        let mut watchers = std::mem::take(&mut self.day_watchers);
        watchers.retain_mut(|w| {
            if w.tx.is_closed() {
                return false;
            }
            let next = self.important_days(&w.user_id);
            if next == w.last {
                return true;
            }
            w.last = next.clone();
            w.tx.send(next)
        });
        self.day_watchers = watchers;
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of day records stored for a user, important or not.
    #[cfg(test)]
    pub fn day_count(&self, user_id: &str) -> usize {
        self.lock().days.get(user_id).map(|m| m.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn open_subscriptions(&self) -> usize {
        let inner = self.lock();
        inner
            .entry_watchers
            .iter()
            .filter(|w| !w.tx.is_closed())
            .count()
            + inner.day_watchers.iter().filter(|w| !w.tx.is_closed()).count()
    }

    /// Makes every following write fail with `error` (None restores writes).
    #[cfg(test)]
    pub(crate) fn fail_writes(&self, error: Option<StoreError>) {
        self.lock().failing_writes = error;
    }

    /// Ends every open channel with `error`, as a dropped connection would.
    #[cfg(test)]
    pub(crate) fn break_channels(&self, error: StoreError) {
        let mut inner = self.lock();
        for w in inner.entry_watchers.drain(..) {
            w.tx.fail(error.clone());
        }
        for w in inner.day_watchers.drain(..) {
            w.tx.fail(error.clone());
        }
    }
}

impl EntryStore for MemoryStore {
    fn subscribe_entries(&self, user_id: &str, query: EntryQuery) -> Subscription<Vec<JournalEntry>> {
        let (tx, sub) = channel();
        let mut inner = self.lock();
        let initial = inner.query_entries(user_id, &query);
        if tx.send(initial.clone()) {
            inner.entry_watchers.push(EntryWatcher {
                user_id: user_id.to_string(),
                query,
                last: initial,
                tx,
            });
        }
        sub
    }

    fn subscribe_important_days(&self, user_id: &str) -> Subscription<Vec<DayMetadata>> {
        let (tx, sub) = channel();
        let mut inner = self.lock();
        let initial = inner.important_days(user_id);
        if tx.send(initial.clone()) {
            inner.day_watchers.push(DayWatcher {
                user_id: user_id.to_string(),
                last: initial,
                tx,
            });
        }
        sub
    }

    async fn fetch_once(&self, user_id: &str, query: &EntryQuery) -> StoreResult<Vec<JournalEntry>> {
        Ok(self.lock().query_entries(user_id, query))
    }

    async fn get_day(&self, user_id: &str, date: &DayKey) -> StoreResult<Option<DayMetadata>> {
        Ok(self
            .lock()
            .days
            .get(user_id)
            .and_then(|m| m.get(date))
            .cloned())
    }

    async fn create_entry(&self, user_id: &str, entry: NewEntry) -> StoreResult<JournalEntry> {
        let mut inner = self.lock();
        inner.check_write()?;
        inner.next_id += 1;
        let id = format!("local-{:06}", inner.next_id);
        let created = entry.into_entry(id.clone(), user_id);
        inner.user_entries(user_id).insert(id, created.clone());
        inner.notify();
        Ok(created)
    }

    async fn update_entry(&self, user_id: &str, id: &str, patch: &EntryPatch) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.check_write()?;
        let entry = inner
            .user_entries(user_id)
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        patch.apply(entry);
        inner.notify();
        Ok(())
    }

    async fn flip_task(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let mut inner = self.lock();
        inner.check_write()?;
        let entry = inner
            .user_entries(user_id)
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        entry.is_completed = !entry.is_completed;
        let now = entry.is_completed;
        inner.notify();
        Ok(now)
    }

    async fn delete_entry(&self, user_id: &str, id: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.check_write()?;
        // Deleting a missing document is not an error.
        if inner.user_entries(user_id).remove(id).is_some() {
            inner.notify();
        }
        Ok(())
    }

    async fn upsert_day(&self, user_id: &str, date: &DayKey, is_important: bool) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.check_write()?;
        inner.days.entry(user_id.to_string()).or_default().insert(
            date.clone(),
            DayMetadata {
                date: date.clone(),
                is_important,
                user_id: user_id.to_string(),
            },
        );
        inner.notify();
        Ok(())
    }
}
