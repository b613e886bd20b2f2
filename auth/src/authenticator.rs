use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::clock::Clock;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and access tokens.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    access_token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_handler` - Access token handler (carries secret, clock and leeway)
    /// * `access_token_ttl` - Lifetime of every issued access token
    pub fn new(jwt_handler: JwtHandler, access_token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler,
            access_token_ttl,
        }
    }

    /// Build an authenticator for `secret` reading time from `clock`.
    pub fn with_clock(
        secret: &[u8],
        clock: Arc<dyn Clock>,
        access_token_ttl: Duration,
        leeway_seconds: u64,
    ) -> Self {
        let jwt_handler = JwtHandler::with_clock(secret, clock).with_leeway(leeway_seconds);
        Self::new(jwt_handler, access_token_ttl)
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Owner of the stored hash
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: Uuid,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => return Err(AuthenticationError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        }

        let access_token = self.generate_token(user_id)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue an access token without password verification.
    ///
    /// Used by the refresh flow, where the refresh token already proved identity.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.jwt_handler.issue(user_id, self.access_token_ttl)
    }

    /// Validate an access token and return its user ID.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Uuid, JwtError> {
        self.jwt_handler.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::clock::FixedClock;

    fn authenticator() -> Authenticator {
        Authenticator::new(
            JwtHandler::new(b"test_secret_key_at_least_32_bytes!"),
            Duration::hours(1),
        )
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();
        let user_id = Uuid::new_v4();

        let hash = authenticator
            .hash_password("correct-password")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("correct-password", &hash, user_id)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded, user_id);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("correct-password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong-password", &hash, Uuid::new_v4());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupted_digest() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("correct-password", "not-a-digest", Uuid::new_v4());
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::MalformedDigest(_)
            ))
        ));
    }

    #[test]
    fn test_generated_token_expires_after_ttl() {
        let clock = Arc::new(FixedClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        let authenticator = Authenticator::with_clock(
            b"test_secret_key_at_least_32_bytes!",
            clock.clone(),
            Duration::minutes(5),
            0,
        );
        let user_id = Uuid::new_v4();

        let token = authenticator.generate_token(user_id).unwrap();
        assert_eq!(authenticator.validate_token(&token), Ok(user_id));

        clock.advance(Duration::minutes(5));
        assert_eq!(authenticator.validate_token(&token), Err(JwtError::Expired));
    }
}
