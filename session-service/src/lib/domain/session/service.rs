use std::sync::Arc;

use async_trait::async_trait;
use auth::credentials;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Clock;
use auth::PasswordError;
use subtle::ConstantTimeEq;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginSession;
use crate::domain::session::models::SessionSettings;
use crate::domain::session::models::UserId;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::session::ports::UserRepository;
use crate::domain::session::refresh::RefreshTokenService;
use crate::domain::session::store::bounded;

/// Domain service implementation for session operations.
///
/// Concrete implementation of SessionServicePort with dependency injection.
pub struct SessionService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: RefreshTokenService<TR>,
    authenticator: Arc<Authenticator>,
    webhook_api_key: String,
    store_timeout: std::time::Duration,
}

impl<UR, TR> SessionService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Read access to the user store
    /// * `refresh_token_repository` - Refresh token persistence implementation
    /// * `clock` - Time source for both token kinds
    /// * `settings` - Signing secret, TTLs, leeway, store timeout and webhook key
    pub fn new(
        users: Arc<UR>,
        refresh_token_repository: Arc<TR>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
    ) -> Self {
        let authenticator = Authenticator::with_clock(
            settings.jwt_secret.as_bytes(),
            Arc::clone(&clock),
            settings.access_token_ttl,
            settings.leeway_seconds,
        );

        Self {
            users,
            refresh_tokens: RefreshTokenService::new(
                refresh_token_repository,
                clock,
                settings.refresh_token_ttl,
                settings.store_timeout,
            ),
            authenticator: Arc::new(authenticator),
            webhook_api_key: settings.webhook_api_key,
            store_timeout: settings.store_timeout,
        }
    }

    /// Refresh token lifecycle operations backing this service.
    pub fn refresh_tokens(&self) -> &RefreshTokenService<TR> {
        &self.refresh_tokens
    }

    // Argon2 verification is CPU bound; keep it off the async workers.
    async fn verify_password(
        &self,
        user_id: UserId,
        password: &str,
        hashed_password: String,
    ) -> Result<String, SessionError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();

        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &hashed_password, user_id.0)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            SessionError::InternalInvariantViolation(format!(
                "password verification task failed: {}",
                e
            ))
        })?;

        match outcome {
            Ok(result) => Ok(result.access_token),
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user_id, reason = "password_mismatch", "Login rejected");
                Err(SessionError::AuthenticationFailed)
            }
            Err(AuthenticationError::PasswordError(PasswordError::MalformedDigest(detail))) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %detail,
                    "Stored password digest is corrupted"
                );
                Err(SessionError::InternalInvariantViolation(format!(
                    "corrupted password digest for user {}",
                    user_id
                )))
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Login failed unexpectedly");
                Err(SessionError::InternalInvariantViolation(e.to_string()))
            }
        }
    }

    fn issue_access_token(&self, user_id: UserId) -> Result<String, SessionError> {
        self.authenticator.generate_token(user_id.0).map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Access token generation failed");
            SessionError::InternalInvariantViolation(format!("token generation failed: {}", e))
        })
    }
}

#[async_trait]
impl<UR, TR> SessionServicePort for SessionService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, SessionError> {
        let credentials = bounded(
            self.store_timeout,
            "users.find_credentials_by_email",
            self.users.find_credentials_by_email(email),
        )
        .await?
        .ok_or_else(|| {
            tracing::warn!(reason = "unknown_email", "Login rejected");
            SessionError::AuthenticationFailed
        })?;

        let access_token = self
            .verify_password(credentials.id, password, credentials.hashed_password)
            .await?;

        let refresh_token = self.refresh_tokens.issue(credentials.id).await?;

        tracing::info!(user_id = %credentials.id, "User logged in");

        Ok(LoginSession {
            user_id: credentials.id,
            access_token,
            refresh_token: refresh_token.token,
            refresh_token_expires_at: refresh_token.expires_at,
        })
    }

    async fn refresh(&self, authorization: Option<&str>) -> Result<String, SessionError> {
        let token = credentials::bearer_token(authorization)?;
        let user_id = self.refresh_tokens.resolve(&token).await?;

        let access_token = self.issue_access_token(user_id)?;
        tracing::debug!(user_id = %user_id, "Access token refreshed");

        Ok(access_token)
    }

    async fn revoke(&self, authorization: Option<&str>) -> Result<(), SessionError> {
        let token = credentials::bearer_token(authorization)?;
        self.refresh_tokens.revoke(&token).await
    }

    async fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, SessionError> {
        let token = credentials::bearer_token(authorization)?;

        self.authenticator
            .validate_token(&token)
            .map(UserId)
            .map_err(|e| {
                tracing::warn!(reason = e.kind(), "Access token rejected");
                SessionError::AuthenticationFailed
            })
    }

    async fn authorize_webhook(&self, authorization: Option<&str>) -> Result<(), SessionError> {
        let key = credentials::api_key(authorization)?;

        // Length still leaks; the key itself does not.
        if bool::from(key.as_bytes().ct_eq(self.webhook_api_key.as_bytes())) {
            Ok(())
        } else {
            tracing::warn!(reason = "api_key_mismatch", "Webhook call rejected");
            Err(SessionError::AuthenticationFailed)
        }
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        self.refresh_tokens.revoke_all_for_user(user_id).await
    }
}
