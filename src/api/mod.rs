//! REST clients for the hosted backend: Identity Toolkit for accounts and
//! Firestore for documents.

pub(crate) mod auth;
pub(crate) mod firestore;
pub(crate) mod value;

use crate::error::{StoreError, StoreErrorKind};
use serde::Deserialize;

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
/// Only `message` and `status` are read.
#[derive(Deserialize, Clone, Debug, Default)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorBody,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl ErrorEnvelope {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

pub(crate) fn with_auth_headers(
    mut req: reqwest::RequestBuilder,
    token: Option<String>,
) -> reqwest::RequestBuilder {
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }
    req
}

/// Maps a failed response to a store error.
pub(crate) fn store_error_from_response(status: u16, body: &str) -> StoreError {
    let env = ErrorEnvelope::parse(body);
    let kind = match (status, env.error.status.as_str()) {
        (_, "PERMISSION_DENIED" | "UNAUTHENTICATED") | (401 | 403, _) => {
            StoreErrorKind::PermissionDenied
        }
        (_, "NOT_FOUND") | (404, _) => StoreErrorKind::NotFound,
        (_, "FAILED_PRECONDITION" | "ABORTED") | (409 | 412, _) => StoreErrorKind::Conflict,
        _ => StoreErrorKind::Http,
    };

    let message = if env.error.message.trim().is_empty() {
        format!("Request failed ({status}): {body}")
    } else {
        env.error.message
    };
    StoreError::new(kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_from_firestore_body() {
        let body = r#"{"error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}}"#;
        let e = store_error_from_response(403, body);
        assert_eq!(e.kind, StoreErrorKind::PermissionDenied);
        assert_eq!(e.message, "Missing or insufficient permissions.");
    }

    #[test]
    fn test_store_error_precondition_is_conflict() {
        let body = r#"{"error": {"code": 400, "message": "the stored version does not match the required base version.", "status": "FAILED_PRECONDITION"}}"#;
        assert_eq!(
            store_error_from_response(400, body).kind,
            StoreErrorKind::Conflict
        );
    }

    #[test]
    fn test_store_error_without_envelope() {
        let e = store_error_from_response(502, "Bad Gateway");
        assert_eq!(e.kind, StoreErrorKind::Http);
        assert_eq!(e.message, "Request failed (502): Bad Gateway");
        assert_eq!(store_error_from_response(404, "").kind, StoreErrorKind::NotFound);
    }
}
