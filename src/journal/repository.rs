use super::LiveList;
use crate::models::{EntryType, JournalEntry};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepositoryKey {
    pub user_id: String,
    pub entry_type: EntryType,
}

impl RepositoryKey {
    pub fn new(user_id: Option<&str>, entry_type: EntryType) -> Option<Self> {
        user_id.map(|u| Self {
            user_id: u.to_string(),
            entry_type,
        })
    }
}

/// Every entry of one category, newest first. Read-only.
pub type RepositoryState = LiveList<RepositoryKey, JournalEntry>;
