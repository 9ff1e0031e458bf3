//! Firestore typed-value encoding for journal documents.
//!
//! Firestore wraps every field in a one-key object such as
//! `{"stringValue": "..."}` or `{"integerValue": "123"}` (64-bit integers are
//! sent as strings).

use crate::error::{StoreError, StoreResult};
use crate::models::{DayMetadata, EntryType, JournalEntry, NewEntry};
use crate::util::DayKey;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::str::FromStr;

pub(crate) type Fields = Map<String, Value>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of `projects/…/documents/users/{uid}/entries/{id}`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

pub(crate) fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub(crate) fn integer_value(n: i64) -> Value {
    json!({ "integerValue": n.to_string() })
}

pub(crate) fn boolean_value(b: bool) -> Value {
    json!({ "booleanValue": b })
}

fn get_string(fields: &Fields, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(|v| v.get("stringValue"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Accepts `integerValue` (string or number) and `doubleValue`.
fn get_i64(fields: &Fields, key: &str) -> Option<i64> {
    let v = fields.get(key)?;
    if let Some(i) = v.get("integerValue") {
        return i
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| i.as_i64());
    }
    v.get("doubleValue")
        .and_then(|d| d.as_f64())
        .map(|d| d.round() as i64)
}

fn get_bool(fields: &Fields, key: &str) -> Option<bool> {
    fields
        .get(key)
        .and_then(|v| v.get("booleanValue"))
        .and_then(|v| v.as_bool())
}

pub(crate) fn entry_fields(user_id: &str, entry: &NewEntry) -> Fields {
    let mut m = Fields::new();
    m.insert("userId".into(), string_value(user_id));
    m.insert("content".into(), string_value(&entry.content));
    m.insert("type".into(), string_value(entry.entry_type.as_ref()));
    m.insert("date".into(), string_value(entry.date.as_str()));
    m.insert("createdAt".into(), integer_value(entry.created_at));
    m.insert("isCompleted".into(), boolean_value(false));
    m
}

pub(crate) fn day_fields(user_id: &str, date: &DayKey, is_important: bool) -> Fields {
    let mut m = Fields::new();
    m.insert("date".into(), string_value(date.as_str()));
    m.insert("isImportant".into(), boolean_value(is_important));
    m.insert("userId".into(), string_value(user_id));
    m
}

pub(crate) fn entry_from_document(doc: &Document, user_id: &str) -> StoreResult<JournalEntry> {
    let f = &doc.fields;
    let missing = |field: &str| StoreError::parse(format!("entry {} has no valid `{field}`", doc.id()));

    let type_name = get_string(f, "type").ok_or_else(|| missing("type"))?;
    let entry_type = EntryType::from_str(&type_name).map_err(|_| missing("type"))?;
    let date = get_string(f, "date")
        .and_then(|d| DayKey::parse(&d).ok())
        .ok_or_else(|| missing("date"))?;

    Ok(JournalEntry {
        id: doc.id().to_string(),
        user_id: get_string(f, "userId").unwrap_or_else(|| user_id.to_string()),
        content: get_string(f, "content").unwrap_or_default(),
        entry_type,
        date,
        created_at: get_i64(f, "createdAt").ok_or_else(|| missing("createdAt"))?,
        is_completed: get_bool(f, "isCompleted").unwrap_or(false),
    })
}

/// The document id is the date, so a record without a `date` field still decodes.
pub(crate) fn day_from_document(doc: &Document, user_id: &str) -> StoreResult<DayMetadata> {
    let f = &doc.fields;
    let raw = get_string(f, "date").unwrap_or_else(|| doc.id().to_string());
    let date = DayKey::parse(&raw).map_err(StoreError::parse)?;
    Ok(DayMetadata {
        date,
        is_important: get_bool(f, "isImportant").unwrap_or(false),
        user_id: get_string(f, "userId").unwrap_or_else(|| user_id.to_string()),
    })
}

pub(crate) fn is_completed(doc: &Document) -> bool {
    get_bool(&doc.fields, "isCompleted").unwrap_or(false)
}
