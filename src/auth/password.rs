//! Password hashing with Argon2id.
//!
//! Hashes are stored in PHC string format, so parameters travel with the
//! hash and can be tightened later without invalidating existing records.

use crate::error::{AdminError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminError::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `false` for a malformed hash as well as a mismatch; the caller
/// never learns which.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Passw0rd!", &hash));
        assert!(!verify_password("passw0rd!", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("Passw0rd!").unwrap();
        let b = hash_password("Passw0rd!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("Passw0rd!", "not-a-phc-string"));
        assert!(!verify_password("Passw0rd!", ""));
    }
}
