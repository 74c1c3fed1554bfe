//! Driven port for user account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{PersonName, User, UserId, Username};

/// Persistence failures surfaced by [`UserRepository`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// The store could not be reached or a connection could not be checked out.
    #[error("user store unavailable: {message}")]
    Connection { message: String },

    /// A query failed after a connection was established.
    #[error("user store query failed: {message}")]
    Query { message: String },

    /// The write collided with the unique username index.
    #[error("username already exists")]
    DuplicateUsername,
}

impl UserRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Validated fields for a new account row.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub id: Uuid,
    pub name: PersonName,
    pub username: Username,
    pub password_hash: String,
}

/// Profile fields a user may change; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileChanges {
    pub name: Option<PersonName>,
    pub username: Option<Username>,
}

impl UserProfileChanges {
    /// Whether the update carries any change at all.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none()
    }
}

/// Driven port owning user rows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return the stored row.
    async fn insert(&self, record: NewUserRecord) -> Result<User, UserRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch several accounts by id, for display-field resolution.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch an account by its (lowercased) username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserRepositoryError>;

    /// All accounts, registration order.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Apply profile changes; `None` when the account does not exist.
    async fn update(
        &self,
        id: &UserId,
        changes: UserProfileChanges,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Hard-delete an account; `false` when it did not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
