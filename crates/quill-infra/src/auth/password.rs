//! Password hashing with Argon2id.
//!
//! Hashes are emitted in PHC string format, so the salt and parameters
//! travel inside the hash itself and verification needs no side channel.
//! A malformed stored hash is a data problem and surfaces as an error;
//! a wrong password is a normal `Ok(false)`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use quill_core::ports::{AuthError, PasswordService};

pub struct Argon2PasswordService {
    hasher: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Uses the argon2 crate's current recommended defaults (Argon2id).
    pub fn new() -> Self {
        Self {
            hasher: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(self
            .hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_accepts_only_the_original_password() {
        let service = Argon2PasswordService::new();
        let hash = service.hash("quill-and-ink").unwrap();

        assert!(service.verify("quill-and-ink", &hash).unwrap());
        assert!(!service.verify("quill-and-inc", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let service = Argon2PasswordService::new();
        let first = service.hash("quill-and-ink").unwrap();
        let second = service.hash("quill-and-ink").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("quill-and-ink", &second).unwrap());
    }

    #[test]
    fn hashes_are_phc_argon2id_strings() {
        let service = Argon2PasswordService::new();
        let hash = service.hash("quill-and-ink").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_mismatch() {
        let service = Argon2PasswordService::new();
        let err = service.verify("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::HashingError(_)));
    }
}
