//! Salted Argon2 password hashing. Stored credentials are PHC strings; the
//! submitted password is never compared to stored text directly.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::OnceLock;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(password_hash.to_string())
}

/// `Ok(false)` on a wrong password; `Err` only when `stored_hash` is unusable.
pub fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification error: {}", e)),
    }
}

fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("marbet-placeholder").ok())
        .as_deref()
}

/// Runs a full Argon2 verification against a throwaway hash so that
/// rejecting an unknown account costs as much as rejecting a wrong password.
pub fn verify_against_placeholder(password: &str) {
    if let Some(hash) = placeholder_hash() {
        let _ = verify_password(password, hash);
    }
}
