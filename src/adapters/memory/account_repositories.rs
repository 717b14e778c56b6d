//! In-memory activation token and credential stores.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{AccountError, ActivationToken, Credentials};
use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp};
use crate::ports::{ActivationTokenRepository, ConsumeOutcome, CredentialRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryActivationTokenRepository {
    tokens: Arc<RwLock<HashMap<String, ActivationToken>>>,
}

impl InMemoryActivationTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens issued for `email`, oldest first.
    pub async fn tokens_for(&self, email: &EmailAddress) -> Vec<ActivationToken> {
        let mut tokens: Vec<ActivationToken> = self
            .tokens
            .read()
            .await
            .values()
            .filter(|t| &t.email == email)
            .cloned()
            .collect();
        tokens.sort_by_key(|t| t.created_at);
        tokens
    }
}

#[async_trait]
impl ActivationTokenRepository for InMemoryActivationTokenRepository {
    async fn insert(&self, token: &ActivationToken) -> Result<(), DomainError> {
        self.tokens
            .write()
            .await
            .entry(token.token.clone())
            .or_insert_with(|| token.clone());
        Ok(())
    }

    async fn consume(&self, token: &str, at: Timestamp) -> Result<ConsumeOutcome, DomainError> {
        let mut tokens = self.tokens.write().await;
        let Some(stored) = tokens.get_mut(token) else {
            return Ok(ConsumeOutcome::NotFound);
        };
        match stored.consume(at) {
            Ok(email) => Ok(ConsumeOutcome::Consumed(email)),
            Err(AccountError::AlreadyUsed) => Ok(ConsumeOutcome::AlreadyUsed),
            Err(other) => Err(DomainError::new(ErrorCode::InternalError, other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialRepository {
    credentials: Arc<RwLock<HashMap<String, Credentials>>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn upsert(&self, credentials: &Credentials) -> Result<(), DomainError> {
        self.credentials
            .write()
            .await
            .insert(credentials.email.as_str().to_string(), credentials.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credentials>, DomainError> {
        Ok(self.credentials.read().await.get(email.as_str()).cloned())
    }
}
