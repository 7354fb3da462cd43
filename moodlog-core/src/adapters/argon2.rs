//! Argon2id password hashing

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::domain::result::{Error, Result};
use crate::ports::CredentialStore;

/// Credential store backed by Argon2id with a per-password random salt.
///
/// Digests are PHC strings (`$argon2id$v=19$...`), so parameters travel
/// with the hash.
#[derive(Default)]
pub struct Argon2CredentialStore {
    hasher: Argon2<'static>,
}

impl Argon2CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for Argon2CredentialStore {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| Error::Other(format!("Stored password digest is invalid: {}", e)))?;

        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Other(format!("Password verification failed: {}", e))),
        }
    }
}
