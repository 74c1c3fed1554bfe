//! Driven port for password hashing and verification.

/// Failure surfaced by [`PasswordHasher`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Driven port turning raw secrets into stored hashes and back-checking them.
pub trait PasswordHasher: Send + Sync {
    /// Hash a raw password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Verify a candidate password against a stored PHC string.
    ///
    /// `Ok(false)` means the password does not match; `Err` means the stored
    /// hash could not be parsed or the verifier failed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
