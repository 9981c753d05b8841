pub mod auth_service;
pub mod product_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use product_service::ProductService;
pub use user_service::{CreateUser, UpdateUser, UserService};

use thiserror::Error;

use crate::auth::{AuthError, PasswordHasher};
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A `spawn_blocking` task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash off the async workers; Argon2 is tuned to be slow.
pub(crate) async fn hash_password(hasher: &PasswordHasher, password: String) -> Result<String, ServiceError> {
    let hasher = hasher.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await?
        .map_err(AuthError::from)?;
    Ok(hash)
}
