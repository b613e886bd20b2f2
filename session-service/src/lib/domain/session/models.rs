use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::session::errors::RefreshTokenRejection;
use crate::domain::session::errors::UserIdError;

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The slice of a user record needed to check a password.
///
/// Owned by the user store; read-only here.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    pub hashed_password: String,
}

/// Persisted refresh token row.
///
/// Usable iff `revoked_at` is unset and `now < expires_at`.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Build a fresh, unrevoked token row created at `now`.
    pub fn new(token: String, user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Expiry is strict: the token is already expired at `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check usability at `now`.
    ///
    /// Revocation is reported before expiry.
    pub fn check_usable_at(&self, now: DateTime<Utc>) -> Result<UserId, RefreshTokenRejection> {
        if self.is_revoked() {
            return Err(RefreshTokenRejection::Revoked);
        }
        if self.is_expired_at(now) {
            return Err(RefreshTokenRejection::Expired);
        }
        Ok(self.user_id)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("expires_at", &self.expires_at)
            .field("revoked_at", &self.revoked_at)
            .finish()
    }
}

/// Outcome of looking a refresh token up, with the internal reason on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    Usable(UserId),
    Rejected(RefreshTokenRejection),
}

/// Tokens handed to a client after a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Immutable settings shared by the session services.
#[derive(Clone)]
pub struct SessionSettings {
    /// HS256 signing secret for access tokens.
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub leeway_seconds: u64,
    pub store_timeout: std::time::Duration,
    pub webhook_api_key: String,
}

impl fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSettings")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("store_timeout", &self.store_timeout)
            .field("webhook_api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_new_refresh_token() {
        let user_id = UserId::new();
        let token = RefreshToken::new("ab".repeat(32), user_id, t0(), Duration::days(60));

        assert_eq!(token.created_at, t0());
        assert_eq!(token.updated_at, t0());
        assert_eq!(token.expires_at, t0() + Duration::days(60));
        assert!(!token.is_revoked());
        assert_eq!(token.check_usable_at(t0()), Ok(user_id));
    }

    #[test]
    fn test_expiry_boundary() {
        let token = RefreshToken::new("ab".repeat(32), UserId::new(), t0(), Duration::days(60));
        let expiry = t0() + Duration::days(60);

        assert!(!token.is_expired_at(expiry - Duration::seconds(1)));
        assert!(token.is_expired_at(expiry));
        assert_eq!(
            token.check_usable_at(expiry),
            Err(RefreshTokenRejection::Expired)
        );
    }

    #[test]
    fn test_revoked_before_expired() {
        let mut token =
            RefreshToken::new("ab".repeat(32), UserId::new(), t0(), Duration::days(60));
        token.revoked_at = Some(t0());

        assert_eq!(
            token.check_usable_at(t0() + Duration::days(61)),
            Err(RefreshTokenRejection::Revoked)
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = RefreshToken::new("ab".repeat(32), UserId::new(), t0(), Duration::days(60));

        assert!(!format!("{:?}", token).contains(&"ab".repeat(32)));
    }

    #[test]
    fn test_user_id_from_string() {
        let id = Uuid::new_v4();

        assert_eq!(UserId::from_string(&id.to_string()), Ok(UserId(id)));
        assert!(UserId::from_string("not-a-uuid").is_err());
    }
}
