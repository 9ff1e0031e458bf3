use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_POLL_MS: u32 = 2_000;
const MIN_POLL_MS: u32 = 250;

/// Runtime configuration read from `window.ENV`.
///
/// When the Firebase keys are missing the app runs against the in-memory
/// backend (local demo mode); nothing is persisted across reloads then.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    pub firebase_api_key: Option<String>,
    pub firebase_project_id: Option<String>,
    /// Interval between live-query refreshes against the hosted store.
    pub sync_poll_ms: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            firebase_api_key: None,
            firebase_project_id: None,
            sync_poll_ms: DEFAULT_POLL_MS,
        }
    }
}

impl EnvConfig {
    pub fn from_window() -> Self {
        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return Self::default();
        };

        // We support BOTH `FIREBASE_API_KEY` style and lowercase aliases.
        let get = |keys: &[&str]| -> Option<String> {
            keys.iter().find_map(|k| {
                js_sys::Reflect::get(&env, &(*k).into())
                    .ok()
                    .and_then(|v| v.as_string().or_else(|| v.as_f64().map(|n| n.to_string())))
            })
        };

        Self::from_lookup(|key| match key {
            "FIREBASE_API_KEY" => get(&["FIREBASE_API_KEY", "firebase_api_key", "apiKey"]),
            "FIREBASE_PROJECT_ID" => get(&["FIREBASE_PROJECT_ID", "FIREBASE_PID", "projectId"]),
            "SYNC_POLL_MS" => get(&["SYNC_POLL_MS", "sync_poll_ms"]),
            _ => None,
        })
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let sync_poll_ms = lookup("SYNC_POLL_MS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(|v| v.max(MIN_POLL_MS))
            .unwrap_or(DEFAULT_POLL_MS);

        Self {
            firebase_api_key: non_empty(lookup("FIREBASE_API_KEY")),
            firebase_project_id: non_empty(lookup("FIREBASE_PROJECT_ID")),
            sync_poll_ms,
        }
    }

    /// Both keys present: talk to the hosted backend.
    pub fn firebase(&self) -> Option<(String, String)> {
        match (&self.firebase_api_key, &self.firebase_project_id) {
            (Some(key), Some(project)) => Some((key.clone(), project.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_missing_keys_select_local_mode() {
        let cfg = EnvConfig::from_lookup(lookup(&[("FIREBASE_API_KEY", "k")]));
        assert!(cfg.firebase().is_none());
        assert_eq!(cfg.sync_poll_ms, DEFAULT_POLL_MS);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let cfg = EnvConfig::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "  "),
            ("FIREBASE_PROJECT_ID", "stay-app"),
        ]));
        assert_eq!(cfg.firebase_api_key, None);
        assert_eq!(cfg.firebase_project_id.as_deref(), Some("stay-app"));
    }

    #[test]
    fn test_poll_interval_is_clamped() {
        let cfg = EnvConfig::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "k"),
            ("FIREBASE_PROJECT_ID", "p"),
            ("SYNC_POLL_MS", "10"),
        ]));
        assert_eq!(cfg.sync_poll_ms, MIN_POLL_MS);
        assert_eq!(cfg.firebase(), Some(("k".to_string(), "p".to_string())));

        let cfg = EnvConfig::from_lookup(lookup(&[("SYNC_POLL_MS", "abc")]));
        assert_eq!(cfg.sync_poll_ms, DEFAULT_POLL_MS);
    }
}
