use super::{EntryQuery, EntryStore, FirestoreStore, MemoryStore, Subscription};
use crate::config::EnvConfig;
use crate::error::StoreResult;
use crate::models::{DayMetadata, EntryPatch, JournalEntry, NewEntry};
use crate::util::DayKey;

/// The store the app runs against, picked once at startup.
#[derive(Clone)]
pub enum AnyStore {
    Hosted(FirestoreStore),
    Local(MemoryStore),
}

impl AnyStore {
    pub fn from_config(config: &EnvConfig) -> Self {
        match &config.firebase_project_id {
            Some(project) if config.firebase_api_key.is_some() => {
                log::info!("using hosted store for project {project}");
                AnyStore::Hosted(FirestoreStore::new(project, config.sync_poll_ms))
            }
            _ => {
                log::info!("no backend configured; running in local demo mode");
                AnyStore::Local(MemoryStore::new())
            }
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, AnyStore::Local(_))
    }

    /// Forwards the signed-in user's id token to the hosted store.
    pub fn set_token(&self, token: Option<String>) {
        if let AnyStore::Hosted(s) = self {
            s.set_token(token);
        }
    }
}

impl EntryStore for AnyStore {
    fn subscribe_entries(&self, user_id: &str, query: EntryQuery) -> Subscription<Vec<JournalEntry>> {
        match self {
            AnyStore::Hosted(s) => s.subscribe_entries(user_id, query),
            AnyStore::Local(s) => s.subscribe_entries(user_id, query),
        }
    }

    fn subscribe_important_days(&self, user_id: &str) -> Subscription<Vec<DayMetadata>> {
        match self {
            AnyStore::Hosted(s) => s.subscribe_important_days(user_id),
            AnyStore::Local(s) => s.subscribe_important_days(user_id),
        }
    }

    async fn fetch_once(&self, user_id: &str, query: &EntryQuery) -> StoreResult<Vec<JournalEntry>> {
        match self {
            AnyStore::Hosted(s) => s.fetch_once(user_id, query).await,
            AnyStore::Local(s) => s.fetch_once(user_id, query).await,
        }
    }

    async fn get_day(&self, user_id: &str, date: &DayKey) -> StoreResult<Option<DayMetadata>> {
        match self {
            AnyStore::Hosted(s) => s.get_day(user_id, date).await,
            AnyStore::Local(s) => s.get_day(user_id, date).await,
        }
    }

    async fn create_entry(&self, user_id: &str, entry: NewEntry) -> StoreResult<JournalEntry> {
        match self {
            AnyStore::Hosted(s) => s.create_entry(user_id, entry).await,
            AnyStore::Local(s) => s.create_entry(user_id, entry).await,
        }
    }

    async fn update_entry(&self, user_id: &str, id: &str, patch: &EntryPatch) -> StoreResult<()> {
        match self {
            AnyStore::Hosted(s) => s.update_entry(user_id, id, patch).await,
            AnyStore::Local(s) => s.update_entry(user_id, id, patch).await,
        }
    }

    async fn flip_task(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        match self {
            AnyStore::Hosted(s) => s.flip_task(user_id, id).await,
            AnyStore::Local(s) => s.flip_task(user_id, id).await,
        }
    }

    async fn delete_entry(&self, user_id: &str, id: &str) -> StoreResult<()> {
        match self {
            AnyStore::Hosted(s) => s.delete_entry(user_id, id).await,
            AnyStore::Local(s) => s.delete_entry(user_id, id).await,
        }
    }

    async fn upsert_day(&self, user_id: &str, date: &DayKey, is_important: bool) -> StoreResult<()> {
        match self {
            AnyStore::Hosted(s) => s.upsert_day(user_id, date, is_important).await,
            AnyStore::Local(s) => s.upsert_day(user_id, date, is_important).await,
        }
    }
}
