//! Activation token store port.

use async_trait::async_trait;

use crate::domain::account::ActivationToken;
use crate::domain::foundation::{DomainError, EmailAddress, Timestamp};

/// Result of trying to consume a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Token was unused and is now marked used.
    Consumed(EmailAddress),
    AlreadyUsed,
    NotFound,
}

#[async_trait]
pub trait ActivationTokenRepository: Send + Sync {
    async fn insert(&self, token: &ActivationToken) -> Result<(), DomainError>;

    /// Atomically marks the token used.
    ///
    /// Two concurrent calls for the same token see exactly one `Consumed`.
    async fn consume(&self, token: &str, at: Timestamp) -> Result<ConsumeOutcome, DomainError>;
}
