//! Driving ports for account and profile use-cases.
//!
//! Inbound adapters (HTTP handlers) call these ports so they stay free of
//! persistence and crypto concerns; tests substitute deterministic stubs.

use async_trait::async_trait;

use crate::domain::auth::{LoginCredentials, Password};
use crate::domain::error::Error;
use crate::domain::user::{PersonName, User, UserId, Username};

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: PersonName,
    pub username: Username,
    pub password: Password,
}

/// A freshly issued token plus the account it asserts.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub token: String,
    pub user: User,
}

/// Profile fields a user may change; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<PersonName>,
    pub username: Option<Username>,
}

/// Domain use-case port for registration, login, and logout.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and issue its first token.
    ///
    /// Fails with a conflict when the username is already taken.
    async fn register(&self, registration: Registration)
    -> Result<AuthenticatedAccount, Error>;

    /// Verify credentials and issue a token.
    async fn login(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedAccount, Error>;

    /// Revoke a presented token so it stops authenticating before expiry.
    async fn logout(&self, token: &str) -> Result<(), Error>;
}

/// Domain use-case port for reading user records.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All accounts. Projection down to public fields happens at the
    /// boundary; this endpoint serves the full projection to every caller.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One account by id, or not-found.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;
}

/// Domain use-case port for profile mutation.
///
/// Both operations require the caller to be the target account; a mismatch
/// is a forbidden outcome regardless of whether the target exists.
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Update the caller's own profile fields.
    async fn update_user(
        &self,
        caller: &UserId,
        target: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, Error>;

    /// Hard-delete the caller's own account. Articles, view records, and
    /// already-issued tokens are deliberately left untouched.
    async fn delete_user(&self, caller: &UserId, target: &UserId) -> Result<(), Error>;
}
