//! ProvisionAccountHandler - Issues an activation token and emails the link.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::account::{AccountError, ActivationToken};
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::ports::{ActivationMailer, ActivationTokenRepository, MailDelivery};

/// Path of the front-end page that consumes activation tokens.
pub const ACTIVATION_PATH: &str = "/activar";

/// Command to provision account access for a newly activated customer.
#[derive(Debug, Clone)]
pub struct ProvisionAccountCommand {
    pub email: EmailAddress,
}

/// What happened to the activation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    Sent { provider_id: Option<String> },
    /// No email provider configured.
    Skipped,
    /// Provider failed; the token is still valid.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ProvisionAccountResult {
    pub token: ActivationToken,
    pub activation_link: String,
    pub email: EmailOutcome,
}

/// Handler for account provisioning.
///
/// Only storing the token can fail the command. Email delivery problems are
/// logged and reported in the result.
pub struct ProvisionAccountHandler {
    tokens: Arc<dyn ActivationTokenRepository>,
    mailer: Arc<dyn ActivationMailer>,
    frontend_url: String,
}

impl ProvisionAccountHandler {
    pub fn new(
        tokens: Arc<dyn ActivationTokenRepository>,
        mailer: Arc<dyn ActivationMailer>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            tokens,
            mailer,
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn activation_link(&self, token: &str) -> String {
        format!(
            "{}{}?token={}",
            self.frontend_url,
            ACTIVATION_PATH,
            urlencoding::encode(token)
        )
    }

    pub async fn handle(&self, cmd: ProvisionAccountCommand) -> Result<ProvisionAccountResult, AccountError> {
        let token = ActivationToken::issue(cmd.email.clone(), Timestamp::now());
        self.tokens.insert(&token).await?;

        let activation_link = self.activation_link(&token.token);
        let email = match self.mailer.send_activation(&cmd.email, &activation_link).await {
            Ok(MailDelivery::Sent { provider_id }) => {
                info!(email = %cmd.email, "Activation email sent");
                EmailOutcome::Sent { provider_id }
            }
            Ok(MailDelivery::Skipped) => EmailOutcome::Skipped,
            Err(e) => {
                warn!(email = %cmd.email, error = %e, "Activation email failed");
                EmailOutcome::Failed(e.to_string())
            }
        };

        Ok(ProvisionAccountResult {
            token,
            activation_link,
            email,
        })
    }
}
