use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("password hashing failed")]
    HashingFailed,

    #[error("stored hash is not a valid PHC string")]
    InvalidHashFormat,
}

/// Argon2id hasher with a configurable work factor.
///
/// Hashing is deliberately slow; callers on the async runtime should run it
/// through `spawn_blocking`.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash of a random password, verified against when an email is unknown
    /// so both failure paths pay for one full verification.
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let filler = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(filler.as_str().as_bytes(), &SaltString::generate(&mut OsRng))
            .map_err(|_| PasswordError::HashingFailed)?
            .to_string();

        Ok(Self { argon2, dummy_hash })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, PasswordError> {
        Self::new(config.password_hash_memory_kib, config.password_hash_iterations)
    }

    /// Hash a plaintext password into a PHC string with a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordError::HashingFailed)
    }

    /// Constant-time check of `password` against a stored PHC hash.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;
        Ok(self.argon2.verify_password(password.as_bytes(), &parsed).is_ok())
    }

    /// Burn one verification against the dummy hash. Always false.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }
}

/// Minimum requirements for a new password.
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.len() > 1024 {
        return Err("Password must be at most 1024 bytes");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_hasher() -> PasswordHasher {
    // Minimum work factor keeps the test suite fast.
    PasswordHasher::new(8, 1).unwrap()
}
