//! Driven port for opaque identity-token issue/verify.
//!
//! The domain treats tokens as opaque strings carrying a user identity and
//! an expiry; signing mechanics live behind this boundary.

use crate::domain::user::UserId;

/// Failures surfaced by [`TokenIssuer`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenIssuerError {
    /// The token could not be produced.
    #[error("failed to issue token: {message}")]
    Issue { message: String },

    /// The token is malformed, has a bad signature, or has expired. The
    /// variants are deliberately collapsed: callers treat them all as
    /// "not authenticated".
    #[error("token is invalid or expired")]
    Invalid,
}

impl TokenIssuerError {
    /// Create an issue error with the given message.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }
}

/// Driven port signing and verifying identity tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token asserting `user`'s identity until the configured expiry.
    fn issue(&self, user: &UserId) -> Result<String, TokenIssuerError>;

    /// Verify a presented token and extract the asserted identity.
    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError>;
}
