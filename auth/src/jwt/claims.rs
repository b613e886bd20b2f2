use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Issuer stamped into every access token.
pub const ISSUER: &str = "chirpy";

/// Access token claims (RFC 7519 registered claims only).
///
/// Field order is fixed by the struct so the serialized payload is canonical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (user ID as UUID string)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `ttl` from `issued_at`.
    ///
    /// `iat` and `exp` are NumericDates: both are truncated to whole seconds,
    /// so with a sub-second `issued_at` the token stops validating up to one
    /// second before `issued_at + ttl`.
    pub fn for_user(user_id: Uuid, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Check if token is expired at `current_timestamp`.
    ///
    /// Expiry is strict: a token is already expired at the instant `exp`.
    /// `leeway_seconds` extends that instant to tolerate clock skew.
    pub fn is_expired(&self, current_timestamp: i64, leeway_seconds: i64) -> bool {
        current_timestamp >= self.exp.saturating_add(leeway_seconds)
    }

    /// Parse the subject into a user ID.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
