//! Driven port for the token revocation set.
//!
//! A TTL-bounded set of invalidated credentials consulted before trusting an
//! otherwise valid token. Entries expire on their own; the set is best-effort
//! by contract — callers on the read path degrade to "not revoked" when the
//! backing cache is unreachable so requests are never blocked on it.

use async_trait::async_trait;

/// Failures surfaced by [`RevocationSet`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevocationSetError {
    /// The cache could not be reached.
    #[error("revocation cache unavailable: {message}")]
    Connection { message: String },

    /// The cache rejected the operation.
    #[error("revocation cache operation failed: {message}")]
    Operation { message: String },
}

impl RevocationSetError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create an operation error with the given message.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }
}

/// Driven port invalidating tokens ahead of their natural expiry.
#[async_trait]
pub trait RevocationSet: Send + Sync {
    /// Add `token` to the set; the entry carries the implementation's TTL.
    async fn revoke(&self, token: &str) -> Result<(), RevocationSetError>;

    /// Whether `token` is currently in the set.
    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationSetError>;
}
