use super::LiveList;
use crate::error::StoreResult;
use crate::models::DayMetadata;

/// Keyed by user id.
pub type ImportantState = LiveList<String, DayMetadata>;

/// Most recent first.
pub fn sort_important(mut days: Vec<DayMetadata>) -> Vec<DayMetadata> {
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

pub fn apply_important(state: &mut ImportantState, user_id: &str, item: StoreResult<Vec<DayMetadata>>) -> bool {
    state.apply(&user_id.to_string(), item.map(sort_important))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Phase;
    use crate::store::{EntryStore, MemoryStore};
    use crate::util::DayKey;
    use futures::executor::block_on;

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).expect("valid date")
    }

    #[test]
    fn test_important_days_sorted_descending_and_live() {
        let store = MemoryStore::new();
        for d in ["2024-01-10", "2024-03-01", "2023-12-31"] {
            block_on(store.upsert_day("u1", &day(d), true)).expect("upsert");
        }
        block_on(store.upsert_day("u1", &day("2024-02-02"), false)).expect("upsert");

        let user = "u1".to_string();
        let mut state = ImportantState::default();
        state.begin(Some(user.clone()));
        let mut sub = store.subscribe_important_days("u1");
        while let Some(item) = sub.try_next_snapshot() {
            apply_important(&mut state, &user, item);
        }
        assert_eq!(state.phase, Phase::Ready);
        let dates: Vec<&str> = state.items.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-10", "2023-12-31"]);

        block_on(store.upsert_day("u1", &day("2024-03-01"), false)).expect("upsert");
        while let Some(item) = sub.try_next_snapshot() {
            apply_important(&mut state, &user, item);
        }
        assert_eq!(state.items.len(), 2);
    }
}
