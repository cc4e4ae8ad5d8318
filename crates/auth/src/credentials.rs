//! Credential hashing.
//!
//! Salted SHA-256, stored as a single `salt$digest` string. The plaintext
//! password never leaves the registration/login code paths.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use dentalis_core::DomainError;

/// A salted password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let salt = Uuid::now_v7().simple().to_string();
        let digest = Self::digest_with(&salt, password);
        Self { salt, digest }
    }

    /// Check a candidate password against the stored digest.
    pub fn verify(&self, candidate: &str) -> bool {
        Self::digest_with(&self.salt, candidate) == self.digest
    }

    /// Storage encoding: `salt$digest`.
    pub fn encoded(&self) -> String {
        format!("{}${}", self.salt, self.digest)
    }

    /// Parse the storage encoding produced by [`PasswordHash::encoded`].
    pub fn from_encoded(encoded: &str) -> Result<Self, DomainError> {
        let (salt, digest) = encoded
            .split_once('$')
            .ok_or_else(|| DomainError::internal("malformed password hash"))?;
        Ok(Self {
            salt: salt.to_string(),
            digest: digest.to_string(),
        })
    }

    fn digest_with(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_and_verify() {
        let hash = PasswordHash::derive("pw123456");
        assert!(hash.verify("pw123456"));
        assert!(!hash.verify("pw1234567"));
    }

    #[test]
    fn same_password_different_salts() {
        let a = PasswordHash::derive("pw123456");
        let b = PasswordHash::derive("pw123456");
        assert_ne!(a.encoded(), b.encoded());
    }

    #[test]
    fn encoded_round_trip() {
        let hash = PasswordHash::derive("pw123456");
        let parsed = PasswordHash::from_encoded(&hash.encoded()).unwrap();
        assert!(parsed.verify("pw123456"));
    }

    #[test]
    fn malformed_encoding_is_rejected() {
        assert!(PasswordHash::from_encoded("no-separator").is_err());
    }
}
