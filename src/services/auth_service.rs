use std::sync::Arc;

use tracing::{error, info};

use super::{hash_password, ServiceError};
use crate::auth::{AuthError, IssuedToken, PasswordError, PasswordHasher, Principal, Role, TokenService};
use crate::database::models::{NewUser, User};
use crate::database::UserRepository;

/// Credential verification, login and token-based authentication.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self { users, hasher, tokens }
    }

    /// Check an email/password pair.
    ///
    /// Unknown emails still pay for one verification against a dummy hash,
    /// and both failure paths return the same `InvalidCredentials`.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Principal, ServiceError> {
        let user = self.users.find_by_email(email).await?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let checked = tokio::task::spawn_blocking(move || match user {
            Some(user) => hasher
                .verify(&password, &user.password_hash)
                .map(|ok| if ok { Some(user) } else { None }),
            None => {
                hasher.verify_dummy(&password);
                Ok(None)
            }
        })
        .await?;

        match checked {
            Ok(Some(user)) => Ok(user.principal()),
            Ok(None) => Err(AuthError::InvalidCredentials.into()),
            Err(PasswordError::InvalidHashFormat) => {
                error!("Stored password hash for {} is not a valid PHC string", email);
                Err(AuthError::InvalidCredentials.into())
            }
            Err(e) => Err(AuthError::from(e).into()),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, ServiceError> {
        let principal = self.verify(email, password).await?;
        let token = self.tokens.issue(&principal).map_err(AuthError::from)?;
        info!("User {} logged in as {}", principal.id, principal.role);
        Ok(token)
    }

    /// Self-service sign-up. Always creates a `USER` account.
    pub async fn register(&self, name: String, email: String, password: String) -> Result<User, ServiceError> {
        let password_hash = hash_password(&self.hasher, password).await?;
        let user = self
            .users
            .create(NewUser {
                name,
                email,
                role: Role::User,
                password_hash,
            })
            .await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Resolve a bearer token to the current principal.
    ///
    /// The token only names the user; role and email come from the store.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, ServiceError> {
        let claimed = self.tokens.validate(token).map_err(AuthError::from)?;
        let user = self
            .users
            .find_by_id(claimed.id)
            .await?
            .ok_or(AuthError::PrincipalNotFound(claimed.id))?;
        Ok(user.principal())
    }
}
