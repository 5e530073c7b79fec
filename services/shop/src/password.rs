//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id and stored as PHC strings, so the salt
//! and cost parameters travel with every hash.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use std::sync::Arc;
use thiserror::Error;

/// Tunable cost of the password hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of iterations
    pub time_cost: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_cost: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Errors raised while hashing
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The configured cost parameters are out of range
    #[error("invalid password hashing parameters: {0}")]
    InvalidParams(argon2::Error),

    /// Hashing itself failed
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Password hashing service
#[derive(Clone)]
pub struct PasswordService {
    params: Params,
    /// Hash checked when the user does not exist, so that path costs the same
    dummy_hash: Arc<str>,
}

impl PasswordService {
    /// Create a password service with the given cost parameters
    pub fn new(config: &HasherConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(PasswordError::InvalidParams)?;

        let mut service = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        service.dummy_hash = service.hash("not-a-real-password")?.into();

        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed hash is reported as a mismatch, never as an error. The
    /// parameters embedded in `hash` are used, not the configured ones.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Burn one verification against the dummy hash
    pub fn verify_dummy(&self, password: &str) {
        std::hint::black_box(self.verify(password, &self.dummy_hash));
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> HasherConfig {
    HasherConfig {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}
