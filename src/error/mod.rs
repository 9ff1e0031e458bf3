use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreErrorKind {
    PermissionDenied,
    Network,
    NotFound,
    /// A precondition on the write did not hold (concurrent modification).
    Conflict,
    Parse,
    Http,
}

/// Failure of a document-store call, either a query, a live channel or a write.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(e: impl std::fmt::Display) -> Self {
        Self::new(StoreErrorKind::Network, e.to_string())
    }

    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self::new(StoreErrorKind::Parse, e.to_string())
    }

    #[cfg(test)]
    pub fn permission_denied() -> Self {
        Self::new(
            StoreErrorKind::PermissionDenied,
            "Missing or insufficient permissions.",
        )
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StoreErrorKind::NotFound, format!("No document to update: {what}"))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("An account with this email already exists.")]
    EmailExists,
    #[error("Password should be at least 6 characters.")]
    WeakPassword,
    #[error("That email address is not valid.")]
    InvalidEmail,
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Provider(String),
}

impl AuthError {
    /// Maps an auth-provider error code/message to a user-facing error.
    ///
    /// Identity Toolkit answers with codes such as `EMAIL_EXISTS` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub fn from_provider_message(raw: &str) -> Self {
        let msg = strip_provider_prefix(raw);
        let code = msg.split([' ', ':']).next().unwrap_or_default();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => AuthError::InvalidCredentials,
            "EMAIL_EXISTS" => AuthError::EmailExists,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
            _ => AuthError::Provider(msg.to_string()),
        }
    }
}

/// Drops the provider's `Firebase: ` prefix from an error message.
pub fn strip_provider_prefix(msg: &str) -> &str {
    msg.trim().strip_prefix("Firebase: ").unwrap_or(msg.trim())
}

/// Errors surfaced by the view-models.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum JournalError {
    /// A live channel failed; the view is errored until remounted.
    #[error("{0}")]
    Subscription(StoreError),
    /// A single write failed; the view stays interactive.
    #[error("{0}")]
    Write(StoreError),
    /// A one-shot read failed; the view keeps its phase.
    #[error("{0}")]
    Read(StoreError),
    #[error("{0}")]
    InvalidInput(String),
}

impl JournalError {
    pub fn is_subscription(&self) -> bool {
        matches!(self, JournalError::Subscription(_))
    }
}
