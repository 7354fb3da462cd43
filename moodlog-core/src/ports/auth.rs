//! Credential and token ports

use chrono::Duration;

use crate::domain::result::Result;
use crate::domain::AccountId;

/// Password hashing and verification
pub trait CredentialStore: Send + Sync {
    /// Hash a password into an opaque digest
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a password against a digest produced by [`CredentialStore::hash`].
    ///
    /// A mismatch is `Ok(false)`; a digest that cannot be parsed is an error.
    fn verify(&self, password: &str, digest: &str) -> Result<bool>;
}

/// Identity token issuing and validation
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject` that expires after `ttl`
    fn issue(&self, subject: AccountId, ttl: Duration) -> Result<String>;

    /// Return the subject of a valid token.
    ///
    /// Fails with `Unauthenticated` for malformed, tampered or expired tokens.
    fn verify(&self, token: &str) -> Result<AccountId>;
}
