use std::sync::Arc;

use auth::Clock;
use chrono::Duration;

use crate::domain::session::errors::RefreshTokenRejection;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::RefreshTokenStatus;
use crate::domain::session::models::UserId;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::store::bounded;

/// Refresh token lifecycle: issue, resolve, revoke.
///
/// Every store call is bounded by `store_timeout`.
pub struct RefreshTokenService<TR>
where
    TR: RefreshTokenRepository,
{
    repository: Arc<TR>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    store_timeout: std::time::Duration,
}

impl<TR> RefreshTokenService<TR>
where
    TR: RefreshTokenRepository,
{
    /// Create a refresh token service.
    ///
    /// # Arguments
    /// * `repository` - Refresh token persistence implementation
    /// * `clock` - Time source for creation and expiry
    /// * `ttl` - Lifetime of every issued token
    /// * `store_timeout` - Upper bound for each store call
    pub fn new(
        repository: Arc<TR>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        store_timeout: std::time::Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            ttl,
            store_timeout,
        }
    }

    /// Generate and persist a new refresh token for `user_id`.
    ///
    /// # Returns
    /// The stored row; `token` and `expires_at` go back to the client
    ///
    /// # Errors
    /// * `StoreUnavailable` - Insert failed or timed out
    /// * `InternalInvariantViolation` - Token value collided with an existing row
    pub async fn issue(&self, user_id: UserId) -> Result<RefreshToken, SessionError> {
        let row = RefreshToken::new(
            auth::generate_refresh_token(),
            user_id,
            self.clock.now(),
            self.ttl,
        );

        bounded(
            self.store_timeout,
            "refresh_tokens.insert",
            self.repository.insert(&row),
        )
        .await?;

        tracing::info!(
            user_id = %user_id,
            expires_at = %row.expires_at,
            "Refresh token issued"
        );

        Ok(row)
    }

    /// Look a token up and report why it is unusable, if it is.
    ///
    /// Tokens that cannot have been issued by this service are reported as
    /// `NotFound` without touching the store.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Lookup failed or timed out
    pub async fn status(&self, token: &str) -> Result<RefreshTokenStatus, SessionError> {
        if !auth::refresh::is_well_formed(token) {
            return Ok(RefreshTokenStatus::Rejected(RefreshTokenRejection::NotFound));
        }

        let row = bounded(
            self.store_timeout,
            "refresh_tokens.find_by_token",
            self.repository.find_by_token(token),
        )
        .await?;

        let status = match row {
            None => RefreshTokenStatus::Rejected(RefreshTokenRejection::NotFound),
            Some(row) => match row.check_usable_at(self.clock.now()) {
                Ok(user_id) => RefreshTokenStatus::Usable(user_id),
                Err(rejection) => RefreshTokenStatus::Rejected(rejection),
            },
        };

        Ok(status)
    }

    /// Resolve a token to its owner.
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Token unknown, expired or revoked (reason is only logged)
    /// * `StoreUnavailable` - Lookup failed or timed out
    pub async fn resolve(&self, token: &str) -> Result<UserId, SessionError> {
        match self.status(token).await? {
            RefreshTokenStatus::Usable(user_id) => Ok(user_id),
            RefreshTokenStatus::Rejected(rejection) => {
                tracing::warn!(reason = rejection.as_str(), "Refresh token rejected");
                Err(SessionError::AuthenticationFailed)
            }
        }
    }

    /// Revoke a token. Unknown and already revoked tokens are a no-op.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Update failed or timed out
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let revoked = bounded(
            self.store_timeout,
            "refresh_tokens.set_revoked",
            self.repository.set_revoked(token, self.clock.now()),
        )
        .await?;

        if revoked {
            tracing::info!("Refresh token revoked");
        } else {
            tracing::debug!("Revoke requested for unknown or already revoked refresh token");
        }

        Ok(())
    }

    /// Revoke every live token of `user_id`.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Update failed or timed out
    pub async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let count = bounded(
            self.store_timeout,
            "refresh_tokens.revoke_all_for_user",
            self.repository
                .revoke_all_for_user(user_id, self.clock.now()),
        )
        .await?;

        tracing::info!(user_id = %user_id, count, "All refresh tokens revoked for user");
        Ok(count)
    }

    /// Delete rows that expired at or before now.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Delete failed or timed out
    pub async fn reap_expired(&self) -> Result<u64, SessionError> {
        let count = bounded(
            self.store_timeout,
            "refresh_tokens.delete_expired",
            self.repository.delete_expired(self.clock.now()),
        )
        .await?;

        tracing::info!(count, "Expired refresh tokens reaped");
        Ok(count)
    }

    /// Delete every token row. Dev tooling only.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Delete failed or timed out
    pub async fn reset(&self) -> Result<u64, SessionError> {
        let count = bounded(
            self.store_timeout,
            "refresh_tokens.delete_all",
            self.repository.delete_all(),
        )
        .await?;

        tracing::warn!(count, "All refresh tokens deleted");
        Ok(count)
    }
}
