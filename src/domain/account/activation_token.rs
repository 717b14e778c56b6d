//! One-time activation tokens.
//!
//! A token is issued when a payment activates a membership and lets the
//! customer set a password. It can be consumed exactly once.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::AccountError;
use crate::domain::foundation::{EmailAddress, Timestamp};

/// Random bytes per token; the wire form is twice as many hex characters.
pub const TOKEN_BYTES: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationToken {
    pub token: String,
    pub email: EmailAddress,
    pub created_at: Timestamp,
    pub used_at: Option<Timestamp>,
}

impl ActivationToken {
    /// Issues a fresh, unused token bound to `email`.
    pub fn issue(email: EmailAddress, now: Timestamp) -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        Self {
            token: hex::encode(bytes),
            email,
            created_at: now,
            used_at: None,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Marks the token used and returns the bound email.
    pub fn consume(&mut self, now: Timestamp) -> Result<EmailAddress, AccountError> {
        if self.is_used() {
            return Err(AccountError::AlreadyUsed);
        }
        self.used_at = Some(now);
        Ok(self.email.clone())
    }
}
