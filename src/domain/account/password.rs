//! Password hashing.
//!
//! PBKDF2-HMAC-SHA256, 120 000 iterations, 32-byte key, with a random
//! 16-byte salt per credential. The salt is stored hex-encoded and the hex
//! text itself is the PBKDF2 salt input, which keeps hashes compatible with
//! rows already in `users_auth`.

use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::AccountError;
use crate::domain::foundation::EmailAddress;

pub const PBKDF2_ITERATIONS: u32 = 120_000;
pub const SALT_BYTES: usize = 16;
pub const HASH_BYTES: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Derived password hash and the salt used to derive it, both hex.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash_hex: String,
    pub salt_hex: String,
}

impl PasswordHash {
    /// Hashes `password` with a fresh random salt.
    ///
    /// Fails when the password is shorter than the minimum length.
    pub fn derive(password: &str) -> Result<Self, AccountError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        let mut salt = [0u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        Ok(Self::derive_with_salt(password, hex::encode(salt)))
    }

    /// Hashes `password` with a known salt.
    pub fn derive_with_salt(password: &str, salt_hex: String) -> Self {
        let hash_hex = hex::encode(derive_key(password, &salt_hex));
        Self { hash_hex, salt_hex }
    }

    /// Constant-time check of `password` against this hash.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = hex::encode(derive_key(password, &self.salt_hex));
        let stored = self.hash_hex.to_ascii_lowercase();
        candidate.len() == stored.len() && bool::from(candidate.as_bytes().ct_eq(stored.as_bytes()))
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHash")
            .field("hash_hex", &"[REDACTED]")
            .field("salt_hex", &"[REDACTED]")
            .finish()
    }
}

fn derive_key(password: &str, salt_hex: &str) -> [u8; HASH_BYTES] {
    let mut key = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt_hex.as_bytes(), PBKDF2_ITERATIONS, &mut key);
    key
}

/// Stored login credentials, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: PasswordHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_then_verify() {
        let hash = PasswordHash::derive("hunter22").unwrap();
        assert!(hash.verify("hunter22"));
        assert!(!hash.verify("hunter23"));
    }

    #[test]
    fn salts_are_random_and_hex() {
        let a = PasswordHash::derive("samepass").unwrap();
        let b = PasswordHash::derive("samepass").unwrap();
        assert_ne!(a.salt_hex, b.salt_hex);
        assert_ne!(a.hash_hex, b.hash_hex);
        assert_eq!(a.salt_hex.len(), SALT_BYTES * 2);
        assert_eq!(a.hash_hex.len(), HASH_BYTES * 2);
    }

    #[test]
    fn known_salt_is_deterministic() {
        let a = PasswordHash::derive_with_salt("secret1", "00ff".to_string());
        let b = PasswordHash::derive_with_salt("secret1", "00ff".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(matches!(
            PasswordHash::derive("12345"),
            Err(AccountError::PasswordTooShort { min: 6 })
        ));
    }

    #[test]
    fn verify_rejects_truncated_hash() {
        let mut hash = PasswordHash::derive("hunter22").unwrap();
        hash.hash_hex.truncate(10);
        assert!(!hash.verify("hunter22"));
    }

    #[test]
    fn debug_redacts_material() {
        let hash = PasswordHash::derive("hunter22").unwrap();
        assert!(!format!("{:?}", hash).contains(&hash.hash_hex));
    }
}
