use super::{LiveList, Phase};
use crate::error::{JournalError, StoreResult};
use crate::models::{DayMetadata, EntryPatch, EntryType, JournalEntry, NewEntry};
use crate::store::EntryStore;
use crate::util::{now_ms, DayKey};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DayViewKey {
    pub user_id: String,
    pub date: DayKey,
}

impl DayViewKey {
    pub fn new(user_id: Option<&str>, date: &DayKey) -> Option<Self> {
        user_id.map(|u| Self {
            user_id: u.to_string(),
            date: date.clone(),
        })
    }
}

/// An importance write in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportanceRequest {
    pub key: DayViewKey,
    pub token: u64,
    pub previous: bool,
    pub next: bool,
}

/// State of one day page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayState {
    pub entries: LiveList<DayViewKey, JournalEntry>,
    pub is_important: bool,
    /// Bumped by every importance toggle and every key change.
    importance_token: u64,
    /// Token when the day record read was issued; a toggle since then wins.
    seeded_at: u64,
}

impl DayState {
    pub fn key(&self) -> Option<&DayViewKey> {
        self.entries.key.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.entries.phase
    }

    pub fn error(&self) -> Option<&JournalError> {
        self.entries.error.as_ref()
    }

    pub fn begin(&mut self, key: Option<DayViewKey>) {
        self.entries.begin(key);
        self.is_important = false;
        self.importance_token += 1;
        self.seeded_at = self.importance_token;
    }

    pub fn apply_snapshot(&mut self, key: &DayViewKey, item: StoreResult<Vec<JournalEntry>>) -> bool {
        self.entries.apply(key, item)
    }

    /// Seeds the importance flag from the one-shot day read.
    ///
    /// A failure lands in the error slot only if it is empty, and never
    /// changes the phase.
    pub fn apply_day_meta(&mut self, key: &DayViewKey, result: StoreResult<Option<DayMetadata>>) -> bool {
        if !self.entries.is_current(key) {
            return false;
        }
        match result {
            Ok(meta) => {
                if self.importance_token == self.seeded_at {
                    self.is_important = meta.is_some_and(|m| m.is_important);
                }
            }
            Err(e) => {
                log::error!("reading day {} failed: {e}", key.date);
                if self.entries.error.is_none() {
                    self.entries.error = Some(JournalError::Read(e));
                }
            }
        }
        true
    }

    pub fn record_write_error(&mut self, error: crate::error::StoreError) {
        self.entries.record_error(JournalError::Write(error));
    }

    /// Flips the flag optimistically. None without a user.
    pub fn begin_importance_toggle(&mut self) -> Option<ImportanceRequest> {
        let key = self.entries.key.clone()?;
        let previous = self.is_important;
        self.is_important = !previous;
        self.importance_token += 1;
        Some(ImportanceRequest {
            key,
            token: self.importance_token,
            previous,
            next: !previous,
        })
    }

    /// Reverts a failed toggle, unless a newer toggle (or key change) has
    /// happened since.
    pub fn finish_importance_toggle(&mut self, req: &ImportanceRequest, result: StoreResult<()>) {
        let Err(e) = result else {
            return;
        };
        if !self.entries.is_current(&req.key) {
            log::error!("importance write for {} failed: {e}", req.key.date);
            return;
        }
        self.record_write_error(e);
        if self.importance_token == req.token {
            self.is_important = req.previous;
        }
    }

    /// Entries of one category, in day order.
    pub fn entries_of(&self, entry_type: EntryType) -> Vec<JournalEntry> {
        self.entries
            .items
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .cloned()
            .collect()
    }
}

/// Writes a new entry for the bound day.
///
/// Ok(None) when nobody is signed in; the caller treats that as a no-op.
pub async fn add_entry<S: EntryStore>(
    store: &S,
    key: Option<&DayViewKey>,
    content: &str,
    entry_type: EntryType,
) -> Result<Option<JournalEntry>, JournalError> {
    let Some(key) = key else {
        return Ok(None);
    };
    let content = content.trim();
    if content.is_empty() {
        return Err(JournalError::InvalidInput("Entry is empty".to_string()));
    }
    let entry = NewEntry {
        content: content.to_string(),
        entry_type,
        date: key.date.clone(),
        created_at: now_ms(),
    };
    store
        .create_entry(&key.user_id, entry)
        .await
        .map(Some)
        .map_err(JournalError::Write)
}

/// Flips a task's completion at the store. Returns the new value.
pub async fn toggle_task<S: EntryStore>(store: &S, key: &DayViewKey, id: &str) -> Result<bool, JournalError> {
    store
        .flip_task(&key.user_id, id)
        .await
        .map_err(JournalError::Write)
}

/// Replaces an entry's text. Blank text is rejected before any write.
pub async fn edit_entry<S: EntryStore>(
    store: &S,
    key: &DayViewKey,
    id: &str,
    content: &str,
) -> Result<(), JournalError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(JournalError::InvalidInput("Entry is empty".to_string()));
    }
    store
        .update_entry(&key.user_id, id, &EntryPatch::content(content))
        .await
        .map_err(JournalError::Write)
}

pub async fn delete_entry<S: EntryStore>(store: &S, key: &DayViewKey, id: &str) -> Result<(), JournalError> {
    store
        .delete_entry(&key.user_id, id)
        .await
        .map_err(JournalError::Write)
}

pub async fn persist_importance<S: EntryStore>(store: &S, req: &ImportanceRequest) -> StoreResult<()> {
    store
        .upsert_day(&req.key.user_id, &req.key.date, req.next)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreErrorKind};
    use crate::store::{EntryQuery, EntryStore, MemoryStore, Subscription};
    use futures::executor::block_on;

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).expect("valid date")
    }

    fn key(user: &str, date: &str) -> DayViewKey {
        DayViewKey {
            user_id: user.to_string(),
            date: day(date),
        }
    }

    /// Mounts a day view the way the page hook does, minus the reactivity.
    struct Harness {
        store: MemoryStore,
        state: DayState,
        sub: Option<Subscription<Vec<JournalEntry>>>,
    }

    impl Harness {
        fn mount(store: &MemoryStore, k: Option<DayViewKey>) -> Self {
            let mut h = Self {
                store: store.clone(),
                state: DayState::default(),
                sub: None,
            };
            h.switch(k);
            h
        }

        fn switch(&mut self, k: Option<DayViewKey>) {
            self.sub = None;
            self.state.begin(k.clone());
            if let Some(k) = k {
                self.sub = Some(self.store.subscribe_entries_for_date(&k.user_id, &k.date));
                let meta = block_on(self.store.get_day(&k.user_id, &k.date));
                self.state.apply_day_meta(&k, meta);
            }
        }

        fn drain(&mut self) {
            let Some(k) = self.state.key().cloned() else {
                return;
            };
            if let Some(sub) = self.sub.as_mut() {
                while let Some(item) = sub.try_next_snapshot() {
                    self.state.apply_snapshot(&k, item);
                }
            }
        }

        fn add(&mut self, content: &str, ty: EntryType) -> Result<Option<JournalEntry>, JournalError> {
            let k = self.state.key().cloned();
            let r = block_on(add_entry(&self.store, k.as_ref(), content, ty));
            self.drain();
            r
        }

        fn contents(&self) -> Vec<String> {
            self.state.entries.items.iter().map(|e| e.content.clone()).collect()
        }
    }

    #[test]
    fn test_day_view_lists_only_its_date_in_creation_order() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, Some(key("u1", "2024-03-05")));
        assert_eq!(h.state.phase(), Phase::Loading);
        h.drain();
        assert_eq!(h.state.phase(), Phase::Ready);
        assert!(h.state.entries.items.is_empty());

        h.add("morning", EntryType::Log).expect("add");
        h.add("noon", EntryType::Task).expect("add");
        block_on(store.create_entry(
            "u1",
            NewEntry {
                content: "yesterday".to_string(),
                entry_type: EntryType::Log,
                date: day("2024-03-04"),
                created_at: 0,
            },
        ))
        .expect("create");
        h.drain();

        assert_eq!(h.contents(), vec!["morning", "noon"]);
        let created: Vec<i64> = h.state.entries.items.iter().map(|e| e.created_at).collect();
        assert!(created.windows(2).all(|w| w[0] <= w[1]));
        assert!(h.state.entries.items.iter().all(|e| e.date == day("2024-03-05")));
    }

    #[test]
    fn test_add_entry_without_user_is_noop() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, None);
        assert_eq!(h.state.phase(), Phase::Uninitialized);
        assert_eq!(h.add("hello", EntryType::Log), Ok(None));
        let all = block_on(store.fetch_once("u1", &EntryQuery::search(Default::default())))
            .expect("fetch");
        assert!(all.is_empty());
    }

    #[test]
    fn test_blank_entry_is_rejected_without_write() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, Some(key("u1", "2024-03-05")));
        let err = h.add("   \n", EntryType::Log).expect_err("blank");
        assert!(matches!(err, JournalError::InvalidInput(_)));
        h.drain();
        assert!(h.state.entries.items.is_empty());
    }

    #[test]
    fn test_new_entry_fields() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, Some(key("u1", "2024-03-05")));
        let e = h
            .add("  buy milk ", EntryType::Task)
            .expect("add")
            .expect("signed in");
        assert_eq!(e.content, "buy milk");
        assert_eq!(e.date, day("2024-03-05"));
        assert_eq!(e.user_id, "u1");
        assert!(!e.is_completed);
        assert!(e.created_at > 0);
    }

    #[test]
    fn test_edit_entry_rewrites_content_in_place() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let mut h = Harness::mount(&store, Some(k.clone()));
        let e = h.add("buy milk", EntryType::Task).expect("add").expect("entry");
        h.add("walk", EntryType::Log).expect("add");

        block_on(edit_entry(&store, &k, &e.id, "  buy oat milk ")).expect("edit");
        h.drain();

        assert_eq!(h.contents(), vec!["buy oat milk", "walk"]);
        let edited = &h.state.entries.items[0];
        assert_eq!(edited.id, e.id);
        assert_eq!(edited.created_at, e.created_at);
        assert_eq!(edited.entry_type, EntryType::Task);
        assert!(!edited.is_completed);
    }

    #[test]
    fn test_blank_edit_is_rejected_without_write() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let mut h = Harness::mount(&store, Some(k.clone()));
        let e = h.add("keep me", EntryType::Log).expect("add").expect("entry");

        let err = block_on(edit_entry(&store, &k, &e.id, " \t")).expect_err("blank");
        assert!(matches!(err, JournalError::InvalidInput(_)));
        h.drain();
        assert_eq!(h.contents(), vec!["keep me"]);
    }

    #[test]
    fn test_edit_of_deleted_entry_is_not_found() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let err = block_on(edit_entry(&store, &k, "gone", "text")).expect_err("missing");
        let JournalError::Write(e) = err else {
            panic!("expected a write error, got {err:?}");
        };
        assert_eq!(e.kind, StoreErrorKind::NotFound);
    }

    #[test]
    fn test_toggle_task_twice_restores_value() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let mut h = Harness::mount(&store, Some(k.clone()));
        let e = h.add("task", EntryType::Task).expect("add").expect("entry");

        assert_eq!(block_on(toggle_task(&store, &k, &e.id)), Ok(true));
        h.drain();
        assert!(h.state.entries.items[0].is_completed);

        assert_eq!(block_on(toggle_task(&store, &k, &e.id)), Ok(false));
        h.drain();
        assert!(!h.state.entries.items[0].is_completed);
    }

    #[test]
    fn test_delete_removes_from_day_view() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let mut h = Harness::mount(&store, Some(k.clone()));
        let a = h.add("keep", EntryType::Log).expect("add").expect("entry");
        let b = h.add("drop", EntryType::Log).expect("add").expect("entry");

        block_on(delete_entry(&store, &k, &b.id)).expect("delete");
        h.drain();
        let ids: Vec<&str> = h.state.entries.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![a.id.as_str()]);
    }

    #[test]
    fn test_importance_toggle_creates_then_clears_single_record() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let mut h = Harness::mount(&store, Some(k.clone()));
        assert!(!h.state.is_important);
        assert_eq!(store.day_count("u1"), 0);

        let req = h.state.begin_importance_toggle().expect("signed in");
        assert!(h.state.is_important);
        let r = block_on(persist_importance(&store, &req));
        h.state.finish_importance_toggle(&req, r);
        let meta = block_on(store.get_day("u1", &k.date)).expect("read");
        assert_eq!(meta.map(|m| m.is_important), Some(true));

        let req = h.state.begin_importance_toggle().expect("signed in");
        let r = block_on(persist_importance(&store, &req));
        h.state.finish_importance_toggle(&req, r);
        assert!(!h.state.is_important);
        assert_eq!(store.day_count("u1"), 1);

        // Remounting seeds from the stored record.
        h.switch(Some(k));
        assert!(!h.state.is_important);
    }

    #[test]
    fn test_failed_importance_write_reverts() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, Some(key("u1", "2024-03-05")));
        store.fail_writes(Some(StoreError::permission_denied()));

        let req = h.state.begin_importance_toggle().expect("signed in");
        let r = block_on(persist_importance(&store, &req));
        h.state.finish_importance_toggle(&req, r);

        assert!(!h.state.is_important);
        assert!(matches!(h.state.error(), Some(JournalError::Write(_))));
        assert_eq!(h.state.phase(), Phase::Loading);
    }

    #[test]
    fn test_stale_importance_failure_does_not_revert_newer_toggle() {
        let mut state = DayState::default();
        state.begin(Some(key("u1", "2024-03-05")));

        let first = state.begin_importance_toggle().expect("signed in");
        let second = state.begin_importance_toggle().expect("signed in");
        assert!(!state.is_important);

        // The first write fails after the second was issued.
        state.finish_importance_toggle(&first, Err(StoreError::network("offline")));
        assert!(!state.is_important);

        state.finish_importance_toggle(&second, Ok(()));
        assert!(!state.is_important);
        assert!(state.error().is_some());
    }

    #[test]
    fn test_latest_failed_toggle_restores_its_own_previous_value() {
        let mut state = DayState::default();
        state.begin(Some(key("u1", "2024-03-05")));
        let _first = state.begin_importance_toggle().expect("signed in");
        let second = state.begin_importance_toggle().expect("signed in");
        state.finish_importance_toggle(&second, Err(StoreError::network("offline")));
        assert!(state.is_important);
    }

    #[test]
    fn test_key_change_ignores_old_snapshots() {
        let store = MemoryStore::new();
        let old = key("u1", "2024-03-05");
        let mut state = DayState::default();
        state.begin(Some(old.clone()));
        let mut old_sub = store.subscribe_entries_for_date("u1", &old.date);

        state.begin(Some(key("u1", "2024-03-06")));
        let item = old_sub.try_next_snapshot().expect("initial snapshot");
        assert!(!state.apply_snapshot(&old, item));
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn test_day_meta_error_does_not_overwrite_existing_error() {
        let k = key("u1", "2024-03-05");
        let mut state = DayState::default();
        state.begin(Some(k.clone()));
        state.apply_snapshot(&k, Err(StoreError::permission_denied()));
        state.apply_day_meta(&k, Err(StoreError::network("offline")));
        assert!(matches!(state.error(), Some(JournalError::Subscription(_))));
        assert_eq!(state.phase(), Phase::Errored);

        let mut fresh = DayState::default();
        fresh.begin(Some(k.clone()));
        fresh.apply_day_meta(&k, Err(StoreError::network("offline")));
        assert!(matches!(fresh.error(), Some(JournalError::Read(_))));
        assert_eq!(fresh.phase(), Phase::Loading);
    }

    #[test]
    fn test_late_day_read_does_not_override_toggle() {
        let k = key("u1", "2024-03-05");
        let mut state = DayState::default();
        state.begin(Some(k.clone()));
        state.begin_importance_toggle();
        state.apply_day_meta(
            &k,
            Ok(Some(DayMetadata {
                date: k.date.clone(),
                is_important: false,
                user_id: "u1".to_string(),
            })),
        );
        assert!(state.is_important);
    }

    #[test]
    fn test_subscription_failure_errors_view() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, Some(key("u1", "2024-03-05")));
        h.drain();
        store.break_channels(StoreError::permission_denied());
        h.drain();
        assert_eq!(h.state.phase(), Phase::Errored);
        let err = h.state.error().expect("error");
        assert_eq!(err.to_string(), "Missing or insufficient permissions.");
    }

    #[test]
    fn test_toggle_missing_task_is_write_error() {
        let store = MemoryStore::new();
        let k = key("u1", "2024-03-05");
        let err = block_on(toggle_task(&store, &k, "gone")).expect_err("missing");
        match err {
            JournalError::Write(e) => assert_eq!(e.kind, StoreErrorKind::NotFound),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_entries_of_category() {
        let store = MemoryStore::new();
        let mut h = Harness::mount(&store, Some(key("u1", "2024-03-05")));
        h.add("t1", EntryType::Task).expect("add");
        h.add("l1", EntryType::Log).expect("add");
        h.add("t2", EntryType::Task).expect("add");
        let tasks: Vec<String> = h
            .state
            .entries_of(EntryType::Task)
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(tasks, vec!["t1", "t2"]);
    }
}
