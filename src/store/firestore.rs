use super::{channel, EntryQuery, EntryStore, SnapshotSender, Subscription};
use crate::api::firestore::{structured_query, FieldFilter, FieldOp, FirestoreClient, Precondition};
use crate::api::value::{
    boolean_value, day_fields, day_from_document, entry_fields, entry_from_document, is_completed,
    string_value, Document, Fields,
};
use crate::error::{StoreError, StoreErrorKind, StoreResult};
use crate::models::{DayMetadata, EntryPatch, JournalEntry, NewEntry};
use crate::util::DayKey;
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use serde_json::Value;
use std::future::Future;

/// Journal store over the Firestore REST API.
///
/// Live queries are emulated by re-running the query every `poll_ms` and
/// pushing the result only when it differs from the last one sent.
#[derive(Clone, Debug)]
pub struct FirestoreStore {
    client: FirestoreClient,
    poll_ms: u32,
}

fn user_doc(user_id: &str) -> String {
    format!("users/{}", urlencoding::encode(user_id))
}

fn entry_path(user_id: &str, id: &str) -> String {
    format!("{}/entries/{}", user_doc(user_id), urlencoding::encode(id))
}

fn day_path(user_id: &str, date: &DayKey) -> String {
    format!("{}/days/{}", user_doc(user_id), date.as_str())
}

pub(crate) fn entry_query_body(query: &EntryQuery) -> Value {
    let f = &query.filter;
    let mut filters = Vec::new();
    if let Some(date) = &f.date {
        filters.push(FieldFilter {
            field: "date",
            op: FieldOp::Equal,
            value: string_value(date.as_str()),
        });
    }
    if let Some(ty) = f.entry_type {
        filters.push(FieldFilter {
            field: "type",
            op: FieldOp::Equal,
            value: string_value(ty.as_ref()),
        });
    }
    if let Some(range) = &f.range {
        filters.push(FieldFilter {
            field: "date",
            op: FieldOp::AtLeast,
            value: string_value(range.start.as_str()),
        });
        filters.push(FieldFilter {
            field: "date",
            op: FieldOp::AtMost,
            value: string_value(range.end.as_str()),
        });
    }
    structured_query("entries", &filters, Some(("createdAt", query.order)))
}

fn important_days_body() -> Value {
    structured_query(
        "days",
        &[FieldFilter {
            field: "isImportant",
            op: FieldOp::Equal,
            value: boolean_value(true),
        }],
        None,
    )
}

/// Only the fields the patch sets; they also form the update mask.
fn patch_fields(patch: &EntryPatch) -> Fields {
    let mut fields = Fields::new();
    if let Some(text) = &patch.content {
        fields.insert("content".into(), string_value(text));
    }
    if let Some(done) = patch.is_completed {
        fields.insert("isCompleted".into(), boolean_value(done));
    }
    fields
}

/// Decodes query results, skipping documents that do not parse.
fn decode_all<T>(docs: &[Document], decode: impl Fn(&Document) -> StoreResult<T>) -> Vec<T> {
    docs.iter()
        .filter_map(|d| match decode(d) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("skipping document {}: {}", d.name, e);
                None
            }
        })
        .collect()
}

impl FirestoreStore {
    pub fn new(project_id: &str, poll_ms: u32) -> Self {
        Self {
            client: FirestoreClient::new(project_id),
            poll_ms,
        }
    }

    /// Id token sent with every request; None after sign-out.
    pub fn set_token(&self, token: Option<String>) {
        self.client.set_token(token);
    }

    async fn query_entries(&self, user_id: &str, query: &EntryQuery) -> StoreResult<Vec<JournalEntry>> {
        let docs = self
            .client
            .run_query(&user_doc(user_id), entry_query_body(query))
            .await?;
        let mut entries = decode_all(&docs, |d| entry_from_document(d, user_id));
        // Server order ties are unspecified; settle them the same way as the local store.
        super::sort_by_created(&mut entries, query.order);
        Ok(entries)
    }

    async fn query_important_days(&self, user_id: &str) -> StoreResult<Vec<DayMetadata>> {
        let docs = self
            .client
            .run_query(&user_doc(user_id), important_days_body())
            .await?;
        Ok(decode_all(&docs, |d| day_from_document(d, user_id)))
    }

    /// Runs `fetch` until the subscriber goes away or a fetch fails.
    fn poll<T, F, Fut>(&self, what: String, fetch: F) -> Subscription<T>
    where
        T: PartialEq + Clone + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = StoreResult<T>> + 'static,
    {
        let (tx, sub) = channel();
        let poll_ms = self.poll_ms;
        spawn_local(async move {
            let mut last: Option<T> = None;
            while poll_round(&what, &tx, &mut last, &fetch).await == PollStep::Continue {
                TimeoutFuture::new(poll_ms).await;
            }
            log::debug!("live query {what} closed");
        });
        sub
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PollStep {
    Continue,
    Stop,
}

/// One round of a polled live query. Skips the fetch once the subscriber is
/// gone, pushes the result only if it differs from `last`, and ends the
/// query on the first error.
async fn poll_round<T, F, Fut>(
    what: &str,
    tx: &SnapshotSender<T>,
    last: &mut Option<T>,
    fetch: &F,
) -> PollStep
where
    T: PartialEq + Clone,
    F: Fn() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    if tx.is_closed() {
        return PollStep::Stop;
    }
    match fetch().await {
        Ok(snapshot) if last.as_ref() == Some(&snapshot) => PollStep::Continue,
        Ok(snapshot) => {
            *last = Some(snapshot.clone());
            if tx.send(snapshot) {
                PollStep::Continue
            } else {
                PollStep::Stop
            }
        }
        Err(e) => {
            log::error!("live query {what} failed: {e}");
            tx.fail(e);
            PollStep::Stop
        }
    }
}

impl EntryStore for FirestoreStore {
    fn subscribe_entries(&self, user_id: &str, query: EntryQuery) -> Subscription<Vec<JournalEntry>> {
        let store = self.clone();
        let user_id = user_id.to_string();
        self.poll(format!("entries {:?}", query.filter), move || {
            let store = store.clone();
            let user_id = user_id.clone();
            let query = query.clone();
            async move { store.query_entries(&user_id, &query).await }
        })
    }

    fn subscribe_important_days(&self, user_id: &str) -> Subscription<Vec<DayMetadata>> {
        let store = self.clone();
        let user_id = user_id.to_string();
        self.poll("important days".to_string(), move || {
            let store = store.clone();
            let user_id = user_id.clone();
            async move { store.query_important_days(&user_id).await }
        })
    }

    async fn fetch_once(&self, user_id: &str, query: &EntryQuery) -> StoreResult<Vec<JournalEntry>> {
        self.query_entries(user_id, query).await
    }

    async fn get_day(&self, user_id: &str, date: &DayKey) -> StoreResult<Option<DayMetadata>> {
        match self.client.get_document(&day_path(user_id, date)).await? {
            Some(doc) => day_from_document(&doc, user_id).map(Some),
            None => Ok(None),
        }
    }

    async fn create_entry(&self, user_id: &str, entry: NewEntry) -> StoreResult<JournalEntry> {
        let collection = format!("{}/entries", user_doc(user_id));
        let doc = self
            .client
            .create_document(&collection, entry_fields(user_id, &entry))
            .await?;
        log::debug!("created entry {}", doc.id());
        Ok(entry.into_entry(doc.id().to_string(), user_id))
    }

    async fn update_entry(&self, user_id: &str, id: &str, patch: &EntryPatch) -> StoreResult<()> {
        self.client
            .patch_document(&entry_path(user_id, id), patch_fields(patch), Precondition::Exists)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => StoreError::not_found(id),
                _ => e,
            })?;
        Ok(())
    }

    async fn flip_task(&self, user_id: &str, id: &str) -> StoreResult<bool> {
        let path = entry_path(user_id, id);
        let doc = self
            .client
            .get_document(&path)
            .await?
            .ok_or_else(|| StoreError::not_found(id))?;
        let next = !is_completed(&doc);

        // Fails with a conflict if someone else wrote the entry since the read.
        let precondition = match doc.update_time {
            Some(t) => Precondition::UpdateTime(t),
            None => Precondition::Exists,
        };
        let mut fields = Fields::new();
        fields.insert("isCompleted".into(), boolean_value(next));
        self.client.patch_document(&path, fields, precondition).await?;
        Ok(next)
    }

    async fn delete_entry(&self, user_id: &str, id: &str) -> StoreResult<()> {
        match self.client.delete_document(&entry_path(user_id, id)).await {
            Err(e) if e.kind == StoreErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    async fn upsert_day(&self, user_id: &str, date: &DayKey, is_important: bool) -> StoreResult<()> {
        self.client
            .patch_document(
                &day_path(user_id, date),
                day_fields(user_id, date, is_important),
                Precondition::None,
            )
            .await?;
        Ok(())
    }
}
