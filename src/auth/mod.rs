//! Authentication and authorization.
//!
//! - [`password`]: salted Argon2id hashing and constant-time verification
//! - [`token`]: signed, time-limited access tokens
//! - [`policy`]: role checks and the per-route access map

pub mod password;
pub mod policy;
pub mod token;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use password::{PasswordError, PasswordHasher};
pub use policy::{authorize, Access, Decision, DenyReason, RoutePolicy};
pub use token::{Claims, IssuedToken, TokenError, TokenService};

/// Coarse permission tier attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Authenticated identity for the lifetime of one request.
///
/// Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("insufficient role")]
    InsufficientRole,

    /// Token verified but the user it names is gone.
    #[error("principal {0} not found")]
    PrincipalNotFound(i64),

    #[error(transparent)]
    Password(#[from] PasswordError),
}
