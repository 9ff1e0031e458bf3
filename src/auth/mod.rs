//! Email/password accounts and the persisted session.

use crate::api::auth::IdentityClient;
use crate::config::EnvConfig;
use crate::error::AuthError;
use crate::models::UserProfile;
use crate::util::now_ms;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Refresh a little before the provider would reject the token.
const EXPIRY_SKEW_MS: i64 = 60_000;
pub(crate) const MIN_PASSWORD_LEN: usize = 6;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: UserProfile,
    pub id_token: String,
    pub refresh_token: Option<String>,
    /// Epoch milliseconds.
    pub expires_at_ms: i64,
}

impl Session {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms.saturating_sub(EXPIRY_SKEW_MS)
    }
}

/// Where a route should send the visitor instead, if anywhere.
///
/// Signed-out visitors only see `/login`; signed-in users never do.
pub fn redirect_for(path: &str, signed_in: bool) -> Option<&'static str> {
    let on_login = path.trim_end_matches('/') == "/login";
    match (signed_in, on_login) {
        (false, false) => Some("/login"),
        (true, true) => Some("/"),
        _ => None,
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail)
    }
}

#[allow(async_fn_in_trait)]
pub trait AuthProvider: Clone + 'static {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Trades the session's refresh token for a new ID token.
    async fn refresh(&self, session: Session) -> Result<Session, AuthError>;

    /// Makes a persisted session usable again, refreshing it if needed.
    /// None means the visitor has to sign in.
    async fn restore(&self, session: Session) -> Option<Session> {
        match ensure_fresh(self, session, now_ms()).await {
            Ok(s) => Some(s),
            Err(e) => {
                log::warn!("session refresh failed: {e}");
                None
            }
        }
    }

    fn sign_out(&self) {}
}

/// `session` while it is still good, a refreshed one otherwise.
pub async fn ensure_fresh<A: AuthProvider>(
    auth: &A,
    session: Session,
    now_ms: i64,
) -> Result<Session, AuthError> {
    if !session.is_expired(now_ms) {
        return Ok(session);
    }
    auth.refresh(session).await
}

/// Wait before the next background refresh. None for sessions that cannot be
/// refreshed (local accounts never expire).
pub fn refresh_delay_ms(session: &Session, now_ms: i64) -> Option<u32> {
    session.refresh_token.as_ref()?;
    let due = session.expires_at_ms.saturating_sub(EXPIRY_SKEW_MS);
    Some(due.saturating_sub(now_ms).clamp(0, i64::from(u32::MAX)) as u32)
}

/// What the background refresher does with a refresh result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshStep {
    Renewed(Session),
    /// Offline or similar; the old token may still work for a while.
    Retry,
    SignOut,
}

impl RefreshStep {
    pub fn from_result(result: Result<Session, AuthError>) -> Self {
        match result {
            Ok(s) => RefreshStep::Renewed(s),
            Err(AuthError::Network(e)) => {
                log::warn!("session refresh failed, will retry: {e}");
                RefreshStep::Retry
            }
            Err(e) => {
                log::error!("session refresh rejected: {e}");
                RefreshStep::SignOut
            }
        }
    }
}

/// Accounts held by the hosted identity provider.
#[derive(Clone, Debug)]
pub struct FirebaseAuth {
    client: IdentityClient,
}

impl FirebaseAuth {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: IdentityClient::new(api_key),
        }
    }
}

impl AuthProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.client.sign_in(email.trim(), password, now_ms()).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.client.sign_up(email.trim(), password, now_ms()).await
    }

    async fn refresh(&self, session: Session) -> Result<Session, AuthError> {
        self.client.refresh(&session, now_ms()).await
    }
}

/// In-memory accounts for the local demo mode.
#[derive(Clone, Default)]
pub struct LocalAuth {
    /// email -> (password, uid)
    accounts: Arc<Mutex<HashMap<String, (String, String)>>>,
}

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn session_for(uid: &str, email: &str) -> Session {
        Session {
            user: UserProfile {
                uid: uid.to_string(),
                email: Some(email.to_string()),
            },
            id_token: format!("local:{uid}"),
            refresh_token: None,
            expires_at_ms: i64::MAX,
        }
    }
}

impl AuthProvider for LocalAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim().to_lowercase();
        validate_email(&email)?;
        let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        match accounts.get(&email) {
            Some((stored, uid)) if stored == password => Ok(Self::session_for(uid, &email)),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim().to_lowercase();
        validate_email(&email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailExists);
        }
        let uid = format!("local-user-{}", accounts.len() + 1);
        accounts.insert(email.clone(), (password.to_string(), uid.clone()));
        Ok(Self::session_for(&uid, &email))
    }

    async fn refresh(&self, session: Session) -> Result<Session, AuthError> {
        Ok(session)
    }
}

/// Auth backend matching the store picked at startup.
#[derive(Clone)]
pub enum AnyAuth {
    Firebase(FirebaseAuth),
    Local(LocalAuth),
}

impl AnyAuth {
    pub fn from_config(config: &EnvConfig) -> Self {
        match config.firebase() {
            Some((api_key, _)) => AnyAuth::Firebase(FirebaseAuth::new(&api_key)),
            None => AnyAuth::Local(LocalAuth::new()),
        }
    }

    /// Local accounts live in memory and are gone after a reload, so their
    /// sessions must not be written to storage.
    pub fn persists_sessions(&self) -> bool {
        matches!(self, AnyAuth::Firebase(_))
    }
}

impl AuthProvider for AnyAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self {
            AnyAuth::Firebase(a) => a.sign_in(email, password).await,
            AnyAuth::Local(a) => a.sign_in(email, password).await,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self {
            AnyAuth::Firebase(a) => a.sign_up(email, password).await,
            AnyAuth::Local(a) => a.sign_up(email, password).await,
        }
    }

    async fn refresh(&self, session: Session) -> Result<Session, AuthError> {
        match self {
            AnyAuth::Firebase(a) => a.refresh(session).await,
            AnyAuth::Local(a) => a.refresh(session).await,
        }
    }

    fn sign_out(&self) {
        match self {
            AnyAuth::Firebase(a) => a.sign_out(),
            AnyAuth::Local(a) => a.sign_out(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_only_hosted_sessions_are_persisted() {
        let local = AnyAuth::from_config(&EnvConfig::from_lookup(|_| None));
        assert!(!local.persists_sessions());

        let hosted = AnyAuth::from_config(&EnvConfig::from_lookup(|k| match k {
            "FIREBASE_API_KEY" => Some("k".to_string()),
            "FIREBASE_PROJECT_ID" => Some("p".to_string()),
            _ => None,
        }));
        assert!(hosted.persists_sessions());
    }

    #[test]
    fn test_redirect_rules() {
        assert_eq!(redirect_for("/", false), Some("/login"));
        assert_eq!(redirect_for("/search", false), Some("/login"));
        assert_eq!(redirect_for("/login", false), None);
        assert_eq!(redirect_for("/login", true), Some("/"));
        assert_eq!(redirect_for("/important", true), None);
        assert_eq!(redirect_for("/no-such-page", false), Some("/login"));
        assert_eq!(redirect_for("/no-such-page", true), None);
    }

    #[test]
    fn test_session_expiry_has_skew() {
        let s = LocalAuth::session_for("u", "a@b.co");
        assert!(!s.is_expired(0));
        let short = Session {
            expires_at_ms: 100_000,
            ..s
        };
        assert!(!short.is_expired(39_999));
        assert!(short.is_expired(40_000));
    }

    #[test]
    fn test_local_sign_up_then_sign_in() {
        let auth = LocalAuth::new();
        let created = block_on(auth.sign_up("Me@Example.com ", "secret1")).expect("sign up");
        assert_eq!(created.user.email.as_deref(), Some("me@example.com"));

        let again = block_on(auth.sign_in("me@example.com", "secret1")).expect("sign in");
        assert_eq!(again.user.uid, created.user.uid);

        assert_eq!(
            block_on(auth.sign_in("me@example.com", "wrong")),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            block_on(auth.sign_in("nobody@example.com", "secret1")),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_local_sign_up_validation() {
        let auth = LocalAuth::new();
        assert_eq!(
            block_on(auth.sign_up("not-an-email", "secret1")),
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(
            block_on(auth.sign_up("a@b.co", "12345")),
            Err(AuthError::WeakPassword)
        );
        block_on(auth.sign_up("a@b.co", "123456")).expect("sign up");
        assert_eq!(
            block_on(auth.sign_up("a@b.co", "abcdef")),
            Err(AuthError::EmailExists)
        );
    }

    /// Hosted-style provider that hands out a new token per refresh.
    #[derive(Clone, Default)]
    struct RotatingAuth {
        refreshes: Arc<Mutex<u32>>,
        reject: bool,
    }

    impl AuthProvider for RotatingAuth {
        async fn sign_in(&self, _: &str, _: &str) -> Result<Session, AuthError> {
            Err(AuthError::InvalidCredentials)
        }

        async fn sign_up(&self, _: &str, _: &str) -> Result<Session, AuthError> {
            Err(AuthError::InvalidCredentials)
        }

        async fn refresh(&self, session: Session) -> Result<Session, AuthError> {
            if self.reject {
                return Err(AuthError::Provider("TOKEN_EXPIRED".to_string()));
            }
            let mut n = self.refreshes.lock().expect("lock");
            *n += 1;
            Ok(Session {
                id_token: format!("token-{n}"),
                expires_at_ms: session.expires_at_ms + 3_600_000,
                ..session
            })
        }
    }

    fn hosted_session(expires_at_ms: i64) -> Session {
        Session {
            refresh_token: Some("r".to_string()),
            expires_at_ms,
            ..LocalAuth::session_for("u1", "a@b.co")
        }
    }

    #[test]
    fn test_expired_session_goes_through_refresh() {
        let auth = RotatingAuth::default();
        let session = hosted_session(3_600_000);

        let fresh = block_on(ensure_fresh(&auth, session.clone(), 1_000)).expect("fresh");
        assert_eq!(fresh, session);
        assert_eq!(*auth.refreshes.lock().expect("lock"), 0);

        let renewed = block_on(ensure_fresh(&auth, session, 3_600_000)).expect("refreshed");
        assert_eq!(renewed.id_token, "token-1");
        assert!(!renewed.is_expired(3_600_000));
        assert_eq!(renewed.user.uid, "u1");
    }

    #[test]
    fn test_rejected_refresh_means_signing_in_again() {
        let auth = RotatingAuth {
            reject: true,
            ..Default::default()
        };
        assert_eq!(block_on(auth.restore(hosted_session(0))), None);
        assert_eq!(
            RefreshStep::from_result(block_on(auth.refresh(hosted_session(0)))),
            RefreshStep::SignOut
        );
        assert_eq!(
            RefreshStep::from_result(Err(AuthError::Network("offline".to_string()))),
            RefreshStep::Retry
        );
    }

    #[test]
    fn test_refresh_is_scheduled_before_expiry() {
        let s = hosted_session(3_600_000);
        assert_eq!(refresh_delay_ms(&s, 0), Some(3_540_000));
        assert_eq!(refresh_delay_ms(&s, 3_590_000), Some(0));
        assert_eq!(refresh_delay_ms(&LocalAuth::session_for("u", "a@b.co"), 0), None);
    }

    #[test]
    fn test_session_json_roundtrip_uses_camel_case() {
        let s = LocalAuth::session_for("u1", "a@b.co");
        let json = serde_json::to_value(&s).expect("serialize");
        assert!(json.get("idToken").is_some());
        assert!(json.get("expiresAtMs").is_some());
    }
}
