use std::sync::Arc;

use tracing::info;

use super::{hash_password, ServiceError};
use crate::auth::{PasswordHasher, Role};
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::{DatabaseError, UserRepository};

/// Validated input for an admin-created account.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Validated partial update; a present password is re-hashed.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)).into())
    }

    pub async fn create(&self, input: CreateUser) -> Result<User, ServiceError> {
        let password_hash = hash_password(&self.hasher, input.password).await?;
        let user = self
            .users
            .create(NewUser {
                name: input.name,
                email: input.email,
                role: input.role,
                password_hash,
            })
            .await?;
        info!("Created user {} with role {}", user.id, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: i64, input: UpdateUser) -> Result<User, ServiceError> {
        let password_hash = match input.password {
            Some(password) => Some(hash_password(&self.hasher, password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: input.name,
            email: input.email,
            role: input.role,
            password_hash,
        };
        Ok(self.users.update(id, changes).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<User, ServiceError> {
        let user = self.users.delete(id).await?;
        info!("Deleted user {}", user.id);
        Ok(user)
    }
}
