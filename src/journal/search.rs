//! One-shot search over a user's entries.
//!
//! Type and date range are pushed to the store; the free-text term is a
//! case-insensitive substring match applied to the fetched rows. That means
//! every matching row for the type/range is downloaded first, which is fine
//! for a personal journal and nothing more.

use crate::error::JournalError;
use crate::models::{EntryType, JournalEntry};
use crate::store::{EntryFilter, EntryQuery, EntryStore};
use crate::util::DateRange;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub term: String,
    pub entry_type: Option<EntryType>,
    pub range: Option<DateRange>,
}

/// Keeps entries whose content contains `term`, ignoring case. A blank term
/// keeps everything.
pub fn filter_by_term(entries: Vec<JournalEntry>, term: &str) -> Vec<JournalEntry> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| e.content.to_lowercase().contains(&needle))
        .collect()
}

pub async fn search<S: EntryStore>(
    store: &S,
    user_id: &str,
    params: &SearchParams,
) -> Result<Vec<JournalEntry>, JournalError> {
    if let Some(range) = &params.range {
        if !range.is_valid() {
            return Err(JournalError::InvalidInput(
                "Start date is after end date.".to_string(),
            ));
        }
    }
    let query = EntryQuery::search(EntryFilter {
        date: None,
        entry_type: params.entry_type,
        range: params.range.clone(),
    });
    let rows = store
        .fetch_once(user_id, &query)
        .await
        .map_err(JournalError::Read)?;
    Ok(filter_by_term(rows, &params.term))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub results: Vec<JournalEntry>,
    pub searching: bool,
    pub error: Option<JournalError>,
    /// Term of the last completed search.
    pub last_term: String,
    token: u64,
}

impl SearchState {
    /// Marks a new search as current. Earlier ones become stale.
    pub fn begin(&mut self) -> u64 {
        self.token += 1;
        self.searching = true;
        self.error = None;
        self.token
    }

    /// Returns false if a newer search has started since `token`.
    pub fn finish(
        &mut self,
        token: u64,
        term: &str,
        result: Result<Vec<JournalEntry>, JournalError>,
    ) -> bool {
        if token != self.token {
            log::debug!("dropping stale search #{token}");
            return false;
        }
        self.searching = false;
        self.last_term = term.to_string();
        match result {
            Ok(rows) => self.results = rows,
            Err(e) => {
                log::error!("search failed: {e}");
                self.results.clear();
                self.error = Some(e);
            }
        }
        true
    }

    pub fn no_results(&self) -> bool {
        !self.searching
            && self.error.is_none()
            && self.results.is_empty()
            && !self.last_term.trim().is_empty()
    }
}
