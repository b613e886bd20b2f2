#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use auth::FixedClock;
use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use session_service::session::errors::SessionError;
use session_service::session::models::RefreshToken;
use session_service::session::models::SessionSettings;
use session_service::session::models::UserCredentials;
use session_service::session::models::UserId;
use session_service::session::ports::RefreshTokenRepository;
use session_service::session::ports::UserRepository;
use session_service::session::service::SessionService;

pub const SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const API_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";
pub const EMAIL: &str = "walt@breakingbad.com";
pub const PASSWORD: &str = "correct-password";

pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn settings() -> SessionSettings {
    SessionSettings {
        jwt_secret: SECRET.to_string(),
        access_token_ttl: Duration::hours(1),
        refresh_token_ttl: Duration::days(60),
        leeway_seconds: 0,
        store_timeout: StdDuration::from_millis(200),
        webhook_api_key: API_KEY.to_string(),
    }
}

/// User store backed by a map keyed by email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserCredentials>>,
}

impl InMemoryUserRepository {
    pub fn with_user(email: &str, password: &str) -> (Self, UserId) {
        let repository = Self::default();
        let user_id = repository.add_user(email, password);
        (repository, user_id)
    }

    pub fn add_user(&self, email: &str, password: &str) -> UserId {
        let id = UserId::new();
        let credentials = UserCredentials {
            id,
            email: email.to_string(),
            hashed_password: PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash password"),
        };
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), credentials);
        id
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, SessionError> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }
}

/// Refresh token store backed by a map; every operation holds the lock for
/// its whole read-modify-write, mirroring row-level atomicity.
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    rows: Mutex<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn row(&self, token: &str) -> Option<RefreshToken> {
        self.rows.lock().unwrap().get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> Result<(), SessionError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&token.token) {
            return Err(SessionError::InternalInvariantViolation(
                "duplicate refresh token".to_string(),
            ));
        }
        rows.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError> {
        Ok(self.rows.lock().unwrap().get(token).cloned())
    }

    async fn set_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(token) {
            Some(row) if row.revoked_at.is_none() => {
                row.revoked_at = Some(revoked_at);
                row.updated_at = revoked_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        revoked_at: DateTime<Utc>,
    ) -> Result<u64, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        let mut count = 0;
        for row in rows.values_mut() {
            if row.user_id == *user_id && row.revoked_at.is_none() {
                row.revoked_at = Some(revoked_at);
                row.updated_at = revoked_at;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.expires_at > cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64, SessionError> {
        let mut rows = self.rows.lock().unwrap();
        let count = rows.len() as u64;
        rows.clear();
        Ok(count)
    }
}

/// Refresh token store that never answers in time.
pub struct StalledRefreshTokenRepository;

#[async_trait]
impl RefreshTokenRepository for StalledRefreshTokenRepository {
    async fn insert(&self, _token: &RefreshToken) -> Result<(), SessionError> {
        stall().await
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<RefreshToken>, SessionError> {
        stall().await
    }

    async fn set_revoked(
        &self,
        _token: &str,
        _revoked_at: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        stall().await
    }

    async fn revoke_all_for_user(
        &self,
        _user_id: &UserId,
        _revoked_at: DateTime<Utc>,
    ) -> Result<u64, SessionError> {
        stall().await
    }

    async fn delete_expired(&self, _cutoff: DateTime<Utc>) -> Result<u64, SessionError> {
        stall().await
    }

    async fn delete_all(&self) -> Result<u64, SessionError> {
        stall().await
    }
}

async fn stall<T>() -> Result<T, SessionError> {
    tokio::time::sleep(StdDuration::from_secs(3600)).await;
    Err(SessionError::StoreUnavailable("stalled".to_string()))
}

/// Session service wired to in-memory stores and a manual clock.
pub struct TestSessions<TR: RefreshTokenRepository> {
    pub service: SessionService<InMemoryUserRepository, TR>,
    pub tokens: Arc<TR>,
    pub clock: Arc<FixedClock>,
    pub user_id: UserId,
}

impl TestSessions<InMemoryRefreshTokenRepository> {
    pub fn new() -> Self {
        Self::with_tokens(InMemoryRefreshTokenRepository::default())
    }

    pub fn with_settings(settings: SessionSettings) -> Self {
        Self::build(InMemoryRefreshTokenRepository::default(), settings)
    }
}

impl<TR: RefreshTokenRepository> TestSessions<TR> {
    pub fn with_tokens(tokens: TR) -> Self {
        Self::build(tokens, settings())
    }

    fn build(tokens: TR, settings: SessionSettings) -> Self {
        let clock = Arc::new(FixedClock::new(t0()));
        let (users, user_id) = InMemoryUserRepository::with_user(EMAIL, PASSWORD);
        let tokens = Arc::new(tokens);

        let service = SessionService::new(
            Arc::new(users),
            Arc::clone(&tokens),
            clock.clone(),
            settings,
        );

        Self {
            service,
            tokens,
            clock,
            user_id,
        }
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
