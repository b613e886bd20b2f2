use thiserror::Error;

/// Error type for `Authorization` header parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Authorization header is missing")]
    Missing,

    #[error("Authorization scheme mismatch: expected {expected}")]
    SchemeMismatch { expected: String },

    #[error("Authorization header is malformed")]
    Malformed,

    #[error("Authorization credential is empty")]
    EmptyValue,
}
