//! Credential and token primitives for the chirpy services.
//!
//! Everything in this crate is pure or stateless:
//! - `Authorization` header parsing (bearer tokens and API keys)
//! - Password hashing (Argon2id)
//! - Access token issuance and validation (HS256 JWT)
//! - Opaque refresh token generation
//!
//! Persistence of refresh tokens lives with the service that owns the store.
//!
//! # Examples
//!
//! ## Header parsing
//! ```
//! use auth::credentials::{bearer_token, CredentialError};
//!
//! assert_eq!(bearer_token(Some("Bearer abc123")).unwrap(), "abc123");
//! assert_eq!(bearer_token(Some("Bearer")), Err(CredentialError::Malformed));
//! ```
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Access tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let user_id = Uuid::new_v4();
//! let token = handler.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(handler.validate(&token).unwrap(), user_id);
//! ```

pub mod authenticator;
pub mod clock;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use credentials::Credential;
pub use credentials::CredentialError;
pub use credentials::Scheme;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::generate_refresh_token;
