use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::ISSUER;
use super::errors::JwtError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Access token handler.
///
/// Issues and validates HS256-signed tokens carrying a user ID. Holds no
/// mutable state, so one instance can be shared across tasks.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    leeway_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key and the system clock.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a handler that reads time from `clock`.
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            leeway_seconds: 0,
            clock,
        }
    }

    /// Tolerate `seconds` of clock skew past `exp`. Defaults to zero.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        self
    }

    /// Issue an access token for `user_id`, valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let claims = Claims::for_user(user_id, self.clock.now(), ttl);
        self.sign(&claims)
    }

    /// Validate an access token and return the user ID it was issued for.
    ///
    /// # Errors
    /// * `AlgorithmMismatch` - Header declares anything other than HS256
    /// * `InvalidSignature` - MAC does not match
    /// * `InvalidIssuer` - Issuer is not this service
    /// * `Expired` - Current time is at or past `exp` (plus leeway)
    /// * `InvalidSubject` - Subject is not a UUID
    /// * `Malformed` - Token cannot be decoded or misses a required claim
    pub fn validate(&self, token: &str) -> Result<Uuid, JwtError> {
        let claims = self.decode(token)?;

        if claims.is_expired(self.clock.now().timestamp(), self.leeway_seconds) {
            return Err(JwtError::Expired);
        }

        claims
            .user_id()
            .map_err(|e| JwtError::InvalidSubject(e.to_string()))
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the injected clock in `validate`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

fn map_decode_error(e: JsonWebTokenError) -> JwtError {
    match e.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => JwtError::AlgorithmMismatch,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed(e.to_string()),
    }
}
