//! Canonical request signature for the payment gateway.
//!
//! The gateway signs a flat parameter map as follows:
//!
//! 1. sort parameter keys lexicographically (byte order)
//! 2. concatenate `key + value` for each key with no separator
//! 3. HMAC-SHA256 the result with the shared secret
//! 4. hex-encode the digest (lower case)
//!
//! The digest travels as parameter `s`. Any deviation in ordering or
//! encoding breaks interoperability, so the canonical string is built in
//! exactly one place.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Parameter name carrying the signature.
pub const SIGNATURE_PARAM: &str = "s";

/// Signature failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Signature parameter missing")]
    Missing,

    #[error("Invalid signature")]
    Mismatch,

    #[error("Signing key rejected: {0}")]
    InvalidKey(String),
}

/// Signs and verifies gateway parameter maps with the shared secret.
#[derive(Clone)]
pub struct SignatureEngine {
    secret: SecretString,
}

impl SignatureEngine {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Signature over `params`. Any `s` entry is ignored.
    pub fn sign(&self, params: &BTreeMap<String, String>) -> Result<String, SignatureError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        mac.update(canonical_string(params).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// `params` in canonical order with the signature appended as `s`.
    pub fn signed_params(
        &self,
        params: BTreeMap<String, String>,
    ) -> Result<Vec<(String, String)>, SignatureError> {
        let signature = self.sign(&params)?;
        let mut signed: Vec<(String, String)> = params
            .into_iter()
            .filter(|(key, _)| key != SIGNATURE_PARAM)
            .collect();
        signed.push((SIGNATURE_PARAM.to_string(), signature));
        Ok(signed)
    }

    /// Recomputes the signature of an inbound map and compares it with the
    /// `s` it carries in constant time.
    pub fn verify(&self, params: &BTreeMap<String, String>) -> Result<(), SignatureError> {
        let provided = params.get(SIGNATURE_PARAM).ok_or(SignatureError::Missing)?;
        let expected = self.sign(params)?;

        if constant_time_compare(expected.as_bytes(), provided.to_ascii_lowercase().as_bytes()) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}

impl std::fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureEngine").finish_non_exhaustive()
    }
}

fn canonical_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != SIGNATURE_PARAM)
        .fold(String::new(), |mut acc, (key, value)| {
            acc.push_str(key);
            acc.push_str(value);
            acc
        })
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
