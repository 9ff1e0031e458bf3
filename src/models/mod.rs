use crate::util::DayKey;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Closed set of journal entry kinds.
///
/// The wire form (document field and URL value) is the lowercase name.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryType {
    Task,
    Log,
    Reflection,
    Fact,
    Vocabulary,
    Birthday,
}

impl EntryType {
    /// Tab / chip label.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Task => "Tasks",
            EntryType::Log => "Logs",
            EntryType::Reflection => "Reflections",
            EntryType::Fact => "Facts",
            EntryType::Vocabulary => "Vocabulary",
            EntryType::Birthday => "Dates",
        }
    }

    /// Day view and composer order.
    pub fn all() -> Vec<EntryType> {
        EntryType::iter().collect()
    }

    /// Types listed on the repository page.
    pub fn repository_tabs() -> [EntryType; 3] {
        [EntryType::Vocabulary, EntryType::Birthday, EntryType::Fact]
    }

    pub fn is_task(self) -> bool {
        self == EntryType::Task
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub date: DayKey,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Only meaningful for tasks. Older documents may omit it.
    #[serde(default)]
    pub is_completed: bool,
}

/// Fields written when an entry is created. The store assigns `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEntry {
    pub content: String,
    pub entry_type: EntryType,
    pub date: DayKey,
    pub created_at: i64,
}

impl NewEntry {
    pub fn into_entry(self, id: String, user_id: &str) -> JournalEntry {
        JournalEntry {
            id,
            user_id: user_id.to_string(),
            content: self.content,
            entry_type: self.entry_type,
            date: self.date,
            created_at: self.created_at,
            is_completed: false,
        }
    }
}

/// Partial update; `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub content: Option<String>,
    pub is_completed: Option<bool>,
}

impl EntryPatch {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub(crate) fn apply(&self, entry: &mut JournalEntry) {
        if let Some(text) = &self.content {
            entry.content = text.clone();
        }
        if let Some(v) = self.is_completed {
            entry.is_completed = v;
        }
    }
}

/// Per-day record, keyed by date. Absence means "not important".
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayMetadata {
    pub date: DayKey,
    pub is_important: bool,
    pub user_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_entry_type_wire_names() {
        assert_eq!(EntryType::Vocabulary.to_string(), "vocabulary");
        assert_eq!(EntryType::from_str("birthday").ok(), Some(EntryType::Birthday));
        assert!(EntryType::from_str("note").is_err());
        assert_eq!(
            serde_json::to_value(EntryType::Reflection).expect("should serialize"),
            "reflection"
        );
    }

    #[test]
    fn test_category_order_and_labels() {
        let labels: Vec<&str> = EntryType::all().into_iter().map(EntryType::label).collect();
        assert_eq!(
            labels,
            vec!["Tasks", "Logs", "Reflections", "Facts", "Vocabulary", "Dates"]
        );
    }

    #[test]
    fn test_entry_deserialize_without_is_completed() {
        // Documents written before tasks carried the flag.
        let json = r#"{
            "id": "e1",
            "userId": "u1",
            "content": "call mom",
            "type": "task",
            "date": "2024-03-05",
            "createdAt": 1709640000000
        }"#;
        let e: JournalEntry = serde_json::from_str(json).expect("entry should parse");
        assert!(!e.is_completed);
        assert_eq!(e.date.as_str(), "2024-03-05");
        assert_eq!(e.entry_type, EntryType::Task);
    }

    #[test]
    fn test_entry_rejects_bad_date() {
        let json = r#"{
            "id": "e1", "userId": "u1", "content": "x", "type": "log",
            "date": "2024-13-40", "createdAt": 1
        }"#;
        assert!(serde_json::from_str::<JournalEntry>(json).is_err());
    }

    #[test]
    fn test_patch_apply() {
        let mut e = NewEntry {
            content: "water plants".to_string(),
            entry_type: EntryType::Task,
            date: DayKey::parse("2024-01-02").expect("valid date"),
            created_at: 10,
        }
        .into_entry("e9".to_string(), "u1");

        EntryPatch {
            is_completed: Some(true),
            ..Default::default()
        }
        .apply(&mut e);
        assert!(e.is_completed);
        EntryPatch::content("water the plants").apply(&mut e);
        assert_eq!(e.content, "water the plants");
        assert!(e.is_completed);
        EntryPatch::default().apply(&mut e);
        assert_eq!(e.content, "water the plants");
    }
}
