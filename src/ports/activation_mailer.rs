//! Outbound activation email port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::EmailAddress;

/// What happened to an activation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailDelivery {
    /// Accepted by the email provider.
    Sent { provider_id: Option<String> },
    /// No provider configured; the link was only logged.
    Skipped,
}

#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Email provider unreachable: {0}")]
    Network(String),

    #[error("Email provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Sends the "set your password" email.
#[async_trait]
pub trait ActivationMailer: Send + Sync {
    async fn send_activation(&self, to: &EmailAddress, activation_link: &str) -> Result<MailDelivery, MailError>;
}
