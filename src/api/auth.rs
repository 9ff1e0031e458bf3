use super::ErrorEnvelope;
use crate::auth::Session;
use crate::error::AuthError;
use crate::models::UserProfile;
use serde::{Deserialize, Serialize};

const IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordRequest {
    pub email: String,
    pub password: String,
    pub return_secure_token: bool,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds, sent as a string.
    #[serde(default)]
    pub expires_in: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub user_id: String,
    #[serde(default)]
    pub expires_in: Option<String>,
}

const DEFAULT_TTL_SECS: i64 = 3600;

fn ttl_ms(expires_in: Option<&str>) -> i64 {
    expires_in
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TTL_SECS)
        * 1000
}

impl PasswordResponse {
    pub fn into_session(self, now_ms: i64) -> Session {
        Session {
            expires_at_ms: now_ms + ttl_ms(self.expires_in.as_deref()),
            user: UserProfile {
                uid: self.local_id,
                email: self.email,
            },
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

impl RefreshResponse {
    /// The refresh endpoint does not echo the email; keep the one we had.
    pub fn into_session(self, previous: &Session, now_ms: i64) -> Session {
        Session {
            expires_at_ms: now_ms + ttl_ms(self.expires_in.as_deref()),
            user: UserProfile {
                uid: self.user_id,
                email: previous.user.email.clone(),
            },
            id_token: self.id_token,
            refresh_token: Some(self.refresh_token),
        }
    }
}

fn auth_error(status: u16, body: &str) -> AuthError {
    let env = ErrorEnvelope::parse(body);
    if env.error.message.trim().is_empty() {
        AuthError::Provider(format!("Request failed ({status}): {body}"))
    } else {
        AuthError::from_provider_message(&env.error.message)
    }
}

/// Email/password accounts via the Identity Toolkit REST API.
#[derive(Clone, Debug)]
pub(crate) struct IdentityClient {
    api_key: String,
}

impl IdentityClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    async fn password_call(&self, method: &str, email: &str, password: &str) -> Result<PasswordResponse, AuthError> {
        let client = reqwest::Client::new();
        let url = format!(
            "{IDENTITY_URL}/accounts:{method}?key={}",
            urlencoding::encode(&self.api_key)
        );
        let res = client
            .post(url)
            .json(&PasswordRequest {
                email: email.to_string(),
                password: password.to_string(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if res.status().is_success() {
            res.json()
                .await
                .map_err(|e| AuthError::Provider(e.to_string()))
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(auth_error(status, &body))
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str, now_ms: i64) -> Result<Session, AuthError> {
        self.password_call("signInWithPassword", email, password)
            .await
            .map(|r| r.into_session(now_ms))
    }

    pub async fn sign_up(&self, email: &str, password: &str, now_ms: i64) -> Result<Session, AuthError> {
        self.password_call("signUp", email, password)
            .await
            .map(|r| r.into_session(now_ms))
    }

    /// Exchanges the refresh token for a new id token.
    pub async fn refresh(&self, session: &Session, now_ms: i64) -> Result<Session, AuthError> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            return Err(AuthError::Provider("Session has no refresh token".to_string()));
        };
        let client = reqwest::Client::new();
        let url = format!("{TOKEN_URL}?key={}", urlencoding::encode(&self.api_key));
        let res = client
            .post(url)
            .json(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token,
            })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if res.status().is_success() {
            let body: RefreshResponse = res
                .json()
                .await
                .map_err(|e| AuthError::Provider(e.to_string()))?;
            Ok(body.into_session(session, now_ms))
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(auth_error(status, &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_response_into_session() {
        let r: PasswordResponse = serde_json::from_str(
            r#"{
                "kind": "identitytoolkit#VerifyPasswordResponse",
                "localId": "uid-1",
                "email": "a@b.co",
                "idToken": "id",
                "refreshToken": "refresh",
                "expiresIn": "3600",
                "registered": true
            }"#,
        )
        .expect("response");
        let s = r.into_session(1_000);
        assert_eq!(s.user.uid, "uid-1");
        assert_eq!(s.user.email.as_deref(), Some("a@b.co"));
        assert_eq!(s.expires_at_ms, 1_000 + 3_600_000);
        assert_eq!(s.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn test_refresh_keeps_email() {
        let prev = Session {
            user: UserProfile {
                uid: "uid-1".to_string(),
                email: Some("a@b.co".to_string()),
            },
            id_token: "old".to_string(),
            refresh_token: Some("r1".to_string()),
            expires_at_ms: 0,
        };
        let r: RefreshResponse = serde_json::from_str(
            r#"{"id_token": "new", "refresh_token": "r2", "user_id": "uid-1", "expires_in": "60", "token_type": "Bearer"}"#,
        )
        .expect("response");
        let s = r.into_session(&prev, 10);
        assert_eq!(s.id_token, "new");
        assert_eq!(s.refresh_token.as_deref(), Some("r2"));
        assert_eq!(s.user.email.as_deref(), Some("a@b.co"));
        assert_eq!(s.expires_at_ms, 60_010);
    }

    #[test]
    fn test_auth_error_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "EMAIL_EXISTS", "errors": []}}"#;
        assert_eq!(auth_error(400, body), AuthError::EmailExists);
        assert_eq!(
            auth_error(500, "oops"),
            AuthError::Provider("Request failed (500): oops".to_string())
        );
    }
}
