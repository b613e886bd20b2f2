use auth::CredentialError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Why a refresh token could not be used.
///
/// Internal only: logged, then collapsed into `SessionError::AuthenticationFailed`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RefreshTokenRejection {
    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token expired")]
    Expired,

    #[error("refresh token revoked")]
    Revoked,
}

impl RefreshTokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTokenRejection::NotFound => "not_found",
            RefreshTokenRejection::Expired => "expired",
            RefreshTokenRejection::Revoked => "revoked",
        }
    }
}

/// Top-level error for all session operations.
///
/// `AuthenticationFailed` deliberately carries no reason: bad password, bad
/// signature and expired, revoked or unknown tokens look the same to a client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid authorization header: {0}")]
    InvalidCredentialFormat(#[from] CredentialError),

    #[error("Authentication failed")]
    AuthenticationFailed,

    // Infrastructure errors
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl SessionError {
    /// Expected failures that map to an "unauthorized" response.
    ///
    /// Everything else is an internal error and must not expose its detail.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidCredentialFormat(_) | SessionError::AuthenticationFailed
        )
    }

    /// Message safe to show to a client.
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            "Unauthorized"
        } else {
            "Internal server error"
        }
    }
}

impl From<sqlx::Error> for SessionError {
    fn from(err: sqlx::Error) -> Self {
        SessionError::StoreUnavailable(err.to_string())
    }
}
