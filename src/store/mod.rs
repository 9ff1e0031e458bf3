//! Document-store client for a user's journal.
//!
//! Two collections live under each user: `users/{uid}/entries` and
//! `users/{uid}/days/{date}`. Queries are expressed as [`EntryQuery`] and run
//! either once ([`EntryStore::fetch_once`]) or live ([`EntryStore::subscribe_entries`]).
//!
//! A live query yields full snapshots, never deltas. The first item is the
//! initial result. An `Err` item is terminal. Dropping the [`Subscription`]
//! closes the channel and the producer stops at its next step.

mod backend;
mod firestore;
mod memory;
mod subscription;

pub use backend::AnyStore;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub(crate) use subscription::{channel, SnapshotSender};
pub use subscription::Subscription;

use crate::error::StoreResult;
use crate::models::{DayMetadata, EntryPatch, EntryType, JournalEntry, NewEntry};
use crate::util::{DateRange, DayKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Field filters pushed down to the store. All set filters must match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub date: Option<DayKey>,
    pub entry_type: Option<EntryType>,
    pub range: Option<DateRange>,
}

impl EntryFilter {
    pub fn on_date(date: DayKey) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn of_type(entry_type: EntryType) -> Self {
        Self {
            entry_type: Some(entry_type),
            ..Default::default()
        }
    }

    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.date.as_ref().map_or(true, |d| &entry.date == d)
            && self.entry_type.map_or(true, |t| entry.entry_type == t)
            && self.range.as_ref().map_or(true, |r| r.contains(&entry.date))
    }
}

/// A filter plus the `createdAt` ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryQuery {
    pub filter: EntryFilter,
    pub order: SortOrder,
}

impl EntryQuery {
    /// Day view: oldest first.
    pub fn for_date(date: &DayKey) -> Self {
        Self {
            filter: EntryFilter::on_date(date.clone()),
            order: SortOrder::Ascending,
        }
    }

    /// Repository view: newest first.
    pub fn for_type(entry_type: EntryType) -> Self {
        Self {
            filter: EntryFilter::of_type(entry_type),
            order: SortOrder::Descending,
        }
    }

    /// Search: newest first.
    pub fn search(filter: EntryFilter) -> Self {
        Self {
            filter,
            order: SortOrder::Descending,
        }
    }

    /// Applies the query to an unordered set of entries.
    pub(crate) fn run<'a>(&self, entries: impl Iterator<Item = &'a JournalEntry>) -> Vec<JournalEntry> {
        let mut out: Vec<JournalEntry> = entries
            .filter(|e| self.filter.matches(e))
            .cloned()
            .collect();
        sort_by_created(&mut out, self.order);
        out
    }
}

/// Ties on `createdAt` fall back to the id so the order is total.
pub(crate) fn sort_by_created(entries: &mut [JournalEntry], order: SortOrder) {
    entries.sort_by(|a, b| {
        let ord = a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id));
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}

/// Per-user journal storage.
///
/// Every write is a single atomic remote operation; nothing spans documents.
/// Nothing retries.
#[allow(async_fn_in_trait)]
pub trait EntryStore: Clone + 'static {
    fn subscribe_entries(&self, user_id: &str, query: EntryQuery) -> Subscription<Vec<JournalEntry>>;

    /// Days whose `isImportant` is true, in no particular order.
    fn subscribe_important_days(&self, user_id: &str) -> Subscription<Vec<DayMetadata>>;

    async fn fetch_once(&self, user_id: &str, query: &EntryQuery) -> StoreResult<Vec<JournalEntry>>;

    async fn get_day(&self, user_id: &str, date: &DayKey) -> StoreResult<Option<DayMetadata>>;

    async fn create_entry(&self, user_id: &str, entry: NewEntry) -> StoreResult<JournalEntry>;

    /// Fails with `NotFound` if the entry does not exist.
    async fn update_entry(&self, user_id: &str, id: &str, patch: &EntryPatch) -> StoreResult<()>;

    /// Flips `isCompleted` without trusting a caller-supplied previous value.
    /// Returns the stored value after the flip.
    async fn flip_task(&self, user_id: &str, id: &str) -> StoreResult<bool>;

    async fn delete_entry(&self, user_id: &str, id: &str) -> StoreResult<()>;

    /// Merge-upsert of the day record; creates it when missing.
    async fn upsert_day(&self, user_id: &str, date: &DayKey, is_important: bool) -> StoreResult<()>;

    fn subscribe_entries_for_date(&self, user_id: &str, date: &DayKey) -> Subscription<Vec<JournalEntry>> {
        self.subscribe_entries(user_id, EntryQuery::for_date(date))
    }

    fn subscribe_entries_for_type(
        &self,
        user_id: &str,
        entry_type: EntryType,
    ) -> Subscription<Vec<JournalEntry>> {
        self.subscribe_entries(user_id, EntryQuery::for_type(entry_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, ty: EntryType, created_at: i64) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            content: format!("content {id}"),
            entry_type: ty,
            date: DayKey::parse(date).expect("valid date"),
            created_at,
            is_completed: false,
        }
    }

    #[test]
    fn test_query_for_date_filters_and_sorts_ascending() {
        let all = vec![
            entry("a", "2024-01-02", EntryType::Log, 30),
            entry("b", "2024-01-01", EntryType::Log, 10),
            entry("c", "2024-01-02", EntryType::Task, 20),
        ];
        let day = DayKey::parse("2024-01-02").expect("valid date");
        let got = EntryQuery::for_date(&day).run(all.iter());
        let ids: Vec<&str> = got.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_query_for_type_sorts_descending() {
        let all = vec![
            entry("a", "2024-01-02", EntryType::Fact, 30),
            entry("b", "2024-01-01", EntryType::Fact, 10),
            entry("c", "2024-01-03", EntryType::Log, 50),
        ];
        let got = EntryQuery::for_type(EntryType::Fact).run(all.iter());
        let ids: Vec<&str> = got.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_filter_combines_type_and_range() {
        let filter = EntryFilter {
            entry_type: Some(EntryType::Log),
            range: Some(DateRange {
                start: DayKey::parse("2024-01-01").expect("valid date"),
                end: DayKey::parse("2024-01-31").expect("valid date"),
            }),
            ..Default::default()
        };
        assert!(filter.matches(&entry("a", "2024-01-31", EntryType::Log, 1)));
        assert!(!filter.matches(&entry("b", "2024-02-01", EntryType::Log, 1)));
        assert!(!filter.matches(&entry("c", "2024-01-10", EntryType::Task, 1)));
    }
}
