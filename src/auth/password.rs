/// Password Hashing and Verification
///
/// Argon2id with the crate's default cost parameters and a fresh random salt
/// per hash. The output is a self-describing PHC string, so parameters and salt
/// travel with the digest.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::error::AuthError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns `HashingFailure` if the primitive fails
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingFailure(e.to_string()))
}

/// Verify a password against a stored PHC hash string
///
/// Returns `Ok(false)` on a plain mismatch.
///
/// # Errors
/// Returns `HashingFailure` if `hash` is not a well-formed Argon2 PHC string.
/// Callers must not treat this as a mismatch: it usually means corrupted storage.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::HashingFailure(format!("Invalid password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(AuthError::HashingFailure(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
