//! User profile domain service.
//!
//! Implements the [`UsersQuery`] and [`UserCommand`] driving ports. Profile
//! mutation is self-service only: the ownership check runs before the target
//! lookup, so a mismatched caller learns nothing about whether the target
//! exists.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ports::{
    ProfileChanges, UserCommand, UserProfileChanges, UserRepository, UserRepositoryError,
    UsersQuery,
};
use crate::domain::user::{User, UserId};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateUsername => Error::conflict("Username already exists"),
    }
}

/// User service implementing the profile driving ports.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create the service over a user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UsersQuery for UserService {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_repository_error)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl UserCommand for UserService {
    async fn update_user(
        &self,
        caller: &UserId,
        target: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, Error> {
        if caller != target {
            return Err(Error::forbidden("Access denied."));
        }

        let ProfileChanges { name, username } = changes;
        self.users
            .update(target, UserProfileChanges { name, username })
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn delete_user(&self, caller: &UserId, target: &UserId) -> Result<(), Error> {
        if caller != target {
            return Err(Error::forbidden("Access denied."));
        }

        let deleted = self
            .users
            .delete(target)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("User not found"))
        }
    }
}
