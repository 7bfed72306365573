//! Salted Argon2id password hashing.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::SecurityConfig;

/// Hash a password using Argon2id with the configured cost factors.
///
/// A fresh random salt is generated on every call, so hashing the same
/// password twice yields two different PHC strings.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; only a malformed hash is an error. The
/// cost factors embedded in the hash are used, not the current config.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn verify_accepts_own_hash() {
        let hash = hash_password("LongEnough1", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("LongEnough1", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_other_password() {
        let hash = hash_password("LongEnough1", &cheap()).unwrap();
        assert!(!verify_password("LongEnough2", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let first = hash_password("LongEnough1", &cheap()).unwrap();
        let second = hash_password("LongEnough1", &cheap()).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("LongEnough1", &second).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("LongEnough1", "not-a-phc-string").is_err());
    }

    #[test]
    fn invalid_params_are_reported() {
        let config = SecurityConfig {
            argon2_parallelism: 0,
            ..cheap()
        };
        assert!(hash_password("LongEnough1", &config).is_err());
    }
}
