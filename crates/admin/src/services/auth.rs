//! Admin password hashing and verification.
//!
//! Hashing lives here rather than in the repository so the CLI's
//! `admin create` command can reuse it.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum admin password length. Stricter than the storefront; these
/// accounts can edit the catalog.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Errors from admin credential handling.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,
    #[error("password hashing error")]
    PasswordHash,
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Hash an admin password with argon2id and a fresh salt.
///
/// # Errors
///
/// Returns `AdminAuthError::WeakPassword` for short passwords,
/// `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminAuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
///
/// # Errors
///
/// Returns `AdminAuthError::InvalidCredentials` on mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AdminAuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AdminAuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            hash_password("short"),
            Err(AdminAuthError::WeakPassword)
        ));
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("a long admin password").unwrap();
        assert!(verify_password("a long admin password", &hash).is_ok());
        assert!(matches!(
            verify_password("not the password", &hash),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }
}
