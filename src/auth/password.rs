use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::HashConfig;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    /// Stored hash unreadable or password mismatch; both read the same to callers.
    #[error("authentication failed")]
    Mismatch,
}

pub trait Hasher: Send + Sync {
    fn generate(&self, plain: &str) -> Result<String, HashError>;
    fn compare(&self, hash: &str, plain: &str) -> Result<(), HashError>;
}

/// Argon2id hasher with salted PHC-string output.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(config: &HashConfig) -> Result<Self, HashError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| HashError::Hash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Hasher for Argon2Hasher {
    fn generate(&self, plain: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                HashError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    fn compare(&self, hash: &str, plain: &str) -> Result<(), HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            debug!(error = %e, "argon2 parse hash error");
            HashError::Mismatch
        })?;
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .map_err(|_| HashError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::new(&HashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params")
    }

    #[test]
    fn hash_and_compare_roundtrip() {
        let hasher = cheap();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.generate(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hasher.compare(&hash, password).is_ok());
    }

    #[test]
    fn compare_rejects_wrong_password() {
        let hasher = cheap();
        let hash = hasher.generate("correct-horse!").expect("hashing should succeed");
        let err = hasher.compare(&hash, "wrong-horse!").unwrap_err();
        assert!(matches!(err, HashError::Mismatch));
    }

    #[test]
    fn compare_reports_malformed_hash_as_mismatch() {
        let err = cheap().compare("not-a-valid-hash", "anything").unwrap_err();
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn salts_every_hash() {
        let hasher = cheap();
        let a = hasher.generate("same!pw").unwrap();
        let b = hasher.generate("same!pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_verifies_under_other_cost_settings() {
        // parameters travel inside the PHC string
        let hash = cheap().generate("portable!").unwrap();
        assert!(Argon2Hasher::default().compare(&hash, "portable!").is_ok());
    }

    #[test]
    fn rejects_unusable_params() {
        let err = Argon2Hasher::new(&HashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, HashError::Hash(_)));
    }
}
