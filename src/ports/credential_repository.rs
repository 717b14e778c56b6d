//! Login credential store port.

use async_trait::async_trait;

use crate::domain::account::Credentials;
use crate::domain::foundation::{DomainError, EmailAddress};

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Inserts or replaces the credentials for the email.
    async fn upsert(&self, credentials: &Credentials) -> Result<(), DomainError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credentials>, DomainError>;
}
