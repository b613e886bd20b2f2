use thiserror::Error;

/// Error type for JWT operations.
///
/// The variants exist for logging. Callers facing a client must collapse
/// every validation variant into one generic "invalid token" outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token signing algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token issuer is not accepted")]
    InvalidIssuer,

    #[error("Token is expired")]
    Expired,

    #[error("Token subject is not a valid user ID: {0}")]
    InvalidSubject(String),
}

impl JwtError {
    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::EncodingFailed(_) => "encoding_failed",
            JwtError::Malformed(_) => "malformed",
            JwtError::InvalidSignature => "invalid_signature",
            JwtError::AlgorithmMismatch => "algorithm_mismatch",
            JwtError::InvalidIssuer => "invalid_issuer",
            JwtError::Expired => "expired",
            JwtError::InvalidSubject(_) => "invalid_subject",
        }
    }
}
