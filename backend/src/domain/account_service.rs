//! Account domain service: registration, login, logout.
//!
//! Implements the [`AuthService`] driving port over the user repository,
//! password hasher, token issuer, and revocation set.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::auth::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::ports::{
    AuthService, AuthenticatedAccount, NewUserRecord, PasswordHasher, Registration,
    RevocationSet, TokenIssuer, UserRepository, UserRepositoryError,
};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateUsername => Error::conflict("Username already exists"),
    }
}

/// Account service implementing the authentication driving port.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    revocations: Arc<dyn RevocationSet>,
}

impl AccountService {
    /// Create the service from its collaborating ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        revocations: Arc<dyn RevocationSet>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            revocations,
        }
    }
}

#[async_trait]
impl AuthService for AccountService {
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<AuthenticatedAccount, Error> {
        // Pre-check for a precise message; the unique index backs the race.
        let existing = self
            .users
            .find_by_username(registration.username.as_ref())
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("Username already exists"));
        }

        let password_hash = self
            .passwords
            .hash(registration.password.expose())
            .map_err(|err| Error::internal(err.to_string()))?;

        let user = self
            .users
            .insert(NewUserRecord {
                id: Uuid::new_v4(),
                name: registration.name,
                username: registration.username,
                password_hash,
            })
            .await
            .map_err(map_repository_error)?;

        let token = self
            .tokens
            .issue(user.id())
            .map_err(|err| Error::internal(err.to_string()))?;

        Ok(AuthenticatedAccount { token, user })
    }

    async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedAccount, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("Invalid credentials"))?;

        let matches = self
            .passwords
            .verify(credentials.password(), user.password_hash())
            .map_err(|err| Error::internal(err.to_string()))?;
        if !matches {
            return Err(Error::unauthorized("Invalid credentials"));
        }

        let token = self
            .tokens
            .issue(user.id())
            .map_err(|err| Error::internal(err.to_string()))?;

        Ok(AuthenticatedAccount { token, user })
    }

    async fn logout(&self, token: &str) -> Result<(), Error> {
        // Unlike the revocation read path, a failed revoke must surface:
        // silently keeping the token alive would break the logout contract.
        self.revocations
            .revoke(token)
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))
    }
}
