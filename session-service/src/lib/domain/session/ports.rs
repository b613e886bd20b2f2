use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginSession;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::UserCredentials;
use crate::domain::session::models::UserId;

/// Port for session domain service operations.
///
/// Header arguments are raw `Authorization` header values, `None` when absent.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify a password and open a session.
    ///
    /// # Returns
    /// Access token plus a freshly persisted refresh token
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown email or wrong password
    /// * `StoreUnavailable` - User or token store failed or timed out
    /// * `InternalInvariantViolation` - Stored digest is corrupted
    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, SessionError>;

    /// Mint a new access token from a `Bearer <refresh-token>` header.
    ///
    /// # Errors
    /// * `InvalidCredentialFormat` - Header missing or malformed
    /// * `AuthenticationFailed` - Token unknown, expired or revoked
    /// * `StoreUnavailable` - Token store failed or timed out
    async fn refresh(&self, authorization: Option<&str>) -> Result<String, SessionError>;

    /// Revoke the refresh token in a `Bearer <refresh-token>` header.
    ///
    /// Unknown and already revoked tokens succeed without change.
    ///
    /// # Errors
    /// * `InvalidCredentialFormat` - Header missing or malformed
    /// * `StoreUnavailable` - Token store failed or timed out
    async fn revoke(&self, authorization: Option<&str>) -> Result<(), SessionError>;

    /// Resolve the user behind a `Bearer <access-token>` header.
    ///
    /// # Errors
    /// * `InvalidCredentialFormat` - Header missing or malformed
    /// * `AuthenticationFailed` - Token invalid, foreign or expired
    async fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, SessionError>;

    /// Check an `ApiKey <key>` header against the configured webhook key.
    ///
    /// # Errors
    /// * `InvalidCredentialFormat` - Header missing or malformed
    /// * `AuthenticationFailed` - Key does not match
    async fn authorize_webhook(&self, authorization: Option<&str>) -> Result<(), SessionError>;

    /// Revoke every live refresh token of a user.
    ///
    /// # Returns
    /// Number of tokens revoked by this call
    ///
    /// # Errors
    /// * `StoreUnavailable` - Token store failed or timed out
    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError>;
}

/// Read access to the user store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve the password digest and identity registered for an email.
    ///
    /// # Returns
    /// Optional credentials (None if no user has this email)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, SessionError>;
}

/// Persistence operations for refresh tokens.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new token row.
    ///
    /// # Errors
    /// * `InternalInvariantViolation` - Token value already exists
    /// * `StoreUnavailable` - Database operation failed
    async fn insert(&self, token: &RefreshToken) -> Result<(), SessionError>;

    /// Retrieve a token row by exact token value.
    ///
    /// # Returns
    /// Optional token row (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError>;

    /// Set `revoked_at` if it is not set yet. Must be atomic for the row.
    ///
    /// # Returns
    /// True if this call revoked the token, false if unknown or already revoked
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn set_revoked(&self, token: &str, revoked_at: DateTime<Utc>)
        -> Result<bool, SessionError>;

    /// Revoke every unrevoked token of a user.
    ///
    /// # Returns
    /// Number of rows changed
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        revoked_at: DateTime<Utc>,
    ) -> Result<u64, SessionError>;

    /// Delete rows whose `expires_at` is at or before `cutoff`.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionError>;

    /// Delete every row. Dev tooling only.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn delete_all(&self) -> Result<u64, SessionError>;
}
