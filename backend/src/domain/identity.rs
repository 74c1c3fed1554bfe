//! Caller identity resolution from bearer tokens.
//!
//! Order matters: the revocation set is consulted before signature
//! verification so a logged-out token dies even while cryptographically
//! valid. A down cache degrades to "not revoked" — requests are never
//! blocked on the revocation store being reachable.

use std::sync::Arc;

use tracing::warn;

use crate::domain::error::Error;
use crate::domain::ports::{RevocationSet, TokenIssuer, UserRepository, UserRepositoryError};
use crate::domain::user::User;

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateUsername => Error::internal(error.to_string()),
    }
}

/// Resolves presented tokens into authenticated users.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<dyn TokenIssuer>,
    revocations: Arc<dyn RevocationSet>,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    /// Create the resolver from its collaborating ports.
    pub fn new(
        tokens: Arc<dyn TokenIssuer>,
        revocations: Arc<dyn RevocationSet>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            tokens,
            revocations,
            users,
        }
    }

    /// Resolve a token into its account, or an unauthorized error.
    ///
    /// Revoked tokens and verification failures both land on unauthorized;
    /// only store faults surface differently.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        match self.revocations.is_revoked(token).await {
            Ok(true) => return Err(Error::unauthorized("Token has been invalidated")),
            Ok(false) => {}
            Err(error) => {
                warn!(error = %error, "revocation check unavailable, treating token as not revoked");
            }
        }

        let user_id = self
            .tokens
            .verify(token)
            .map_err(|_| Error::unauthorized("Invalid token"))?;

        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("Invalid token"))
    }

    /// Resolve an optional token, treating every failure as anonymous.
    pub async fn maybe_authenticate(&self, token: Option<&str>) -> Option<User> {
        let token = token?;
        self.authenticate(token).await.ok()
    }
}
