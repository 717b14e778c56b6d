//! LoginHandler - Grants access to customers with an active membership.

use std::sync::Arc;

use tracing::debug;

use crate::domain::account::AccountError;
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::domain::membership::Membership;
use crate::ports::{CredentialRepository, MembershipRepository};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginResult {
    pub membership: Membership,
    /// The customer has set a password.
    pub has_password: bool,
}

/// Handler for login.
///
/// An active membership is always required. The password becomes mandatory
/// only once the customer has set one.
pub struct LoginHandler {
    memberships: Arc<dyn MembershipRepository>,
    credentials: Arc<dyn CredentialRepository>,
}

impl LoginHandler {
    pub fn new(memberships: Arc<dyn MembershipRepository>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            memberships,
            credentials,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, AccountError> {
        let email = EmailAddress::parse(&cmd.email)?;

        let membership = match self.memberships.find_by_email(&email).await? {
            Some(membership) if membership.is_active(&Timestamp::now()) => membership,
            _ => {
                debug!(email = %email, "Login refused, membership inactive");
                return Err(AccountError::MembershipInactive);
            }
        };

        let Some(credentials) = self.credentials.find_by_email(&email).await? else {
            return Ok(LoginResult {
                membership,
                has_password: false,
            });
        };

        let password = cmd.password.as_deref().unwrap_or_default();
        if password.is_empty() {
            return Err(AccountError::PasswordRequired);
        }
        if !credentials.password.verify(password) {
            return Err(AccountError::InvalidPassword);
        }

        Ok(LoginResult {
            membership,
            has_password: true,
        })
    }
}
