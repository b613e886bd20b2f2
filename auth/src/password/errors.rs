use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password does not match")]
    Mismatch,

    /// The stored digest could not be interpreted. This is data corruption,
    /// not a failed login.
    #[error("Stored password digest is malformed: {0}")]
    MalformedDigest(String),
}
