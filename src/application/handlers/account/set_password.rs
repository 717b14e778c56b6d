//! SetPasswordHandler - Consumes an activation token and stores a password.

use std::sync::Arc;

use tracing::info;

use crate::domain::account::{AccountError, Credentials, PasswordHash};
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::ports::{ActivationTokenRepository, ConsumeOutcome, CredentialRepository};

#[derive(Debug, Clone)]
pub struct SetPasswordCommand {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPasswordResult {
    pub email: EmailAddress,
}

/// Handler for the set-password flow.
///
/// The password is validated and hashed before the token is consumed, so a
/// rejected password does not burn the token.
pub struct SetPasswordHandler {
    tokens: Arc<dyn ActivationTokenRepository>,
    credentials: Arc<dyn CredentialRepository>,
}

impl SetPasswordHandler {
    pub fn new(tokens: Arc<dyn ActivationTokenRepository>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self { tokens, credentials }
    }

    pub async fn handle(&self, cmd: SetPasswordCommand) -> Result<SetPasswordResult, AccountError> {
        let token = cmd.token.trim();
        if token.is_empty() {
            return Err(AccountError::TokenRequired);
        }

        let password = PasswordHash::derive(&cmd.password)?;

        let email = match self.tokens.consume(token, Timestamp::now()).await? {
            ConsumeOutcome::Consumed(email) => email,
            ConsumeOutcome::AlreadyUsed => return Err(AccountError::AlreadyUsed),
            ConsumeOutcome::NotFound => return Err(AccountError::InvalidToken),
        };

        self.credentials
            .upsert(&Credentials {
                email: email.clone(),
                password,
            })
            .await?;

        info!(email = %email, "Password set");
        Ok(SetPasswordResult { email })
    }
}
