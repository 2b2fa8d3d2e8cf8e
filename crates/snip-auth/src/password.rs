//! Argon2id password hashing.
//!
//! Hashing is CPU-bound, so both operations run on tokio's blocking pool.

use crate::error::{AuthError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashes `password` with a fresh random salt, returning a PHC string.
pub async fn hash(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

/// Checks `password` against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored hash is unusable.
pub async fn verify(password: String, phc: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &phc))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

fn verify_blocking(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_salted_argon2id() {
        let first = hash("hunter2".to_string()).await.unwrap();
        let second = hash("hunter2".to_string()).await.unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("hunter2"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn verify_accepts_only_the_original_password() {
        let phc = hash("hunter2".to_string()).await.unwrap();

        assert!(verify("hunter2".to_string(), phc.clone()).await.unwrap());
        assert!(!verify("hunter3".to_string(), phc).await.unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_malformed_hash() {
        let err = verify("hunter2".to_string(), "not-a-hash".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordHash(_)));
    }
}
