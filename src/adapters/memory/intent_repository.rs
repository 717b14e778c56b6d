//! In-memory payment intent store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::checkout::{CommerceOrder, IntentStatus, PaymentIntent};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::IntentRepository;

/// Intents held in a map keyed by commerce order.
///
/// Status transitions run under the write lock, which gives them the same
/// compare-and-set behaviour as the conditional SQL update.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntentRepository {
    intents: Arc<RwLock<HashMap<String, PaymentIntent>>>,
}

impl InMemoryIntentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.intents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.intents.read().await.is_empty()
    }
}

#[async_trait]
impl IntentRepository for InMemoryIntentRepository {
    async fn save(&self, intent: &PaymentIntent) -> Result<(), DomainError> {
        let mut intents = self.intents.write().await;
        intents.insert(intent.commerce_order.as_str().to_string(), intent.clone());
        Ok(())
    }

    async fn find_by_commerce_order(&self, order: &CommerceOrder) -> Result<Option<PaymentIntent>, DomainError> {
        Ok(self.intents.read().await.get(order.as_str()).cloned())
    }

    async fn find_by_gateway_token(&self, token: &str) -> Result<Option<PaymentIntent>, DomainError> {
        let intents = self.intents.read().await;
        Ok(intents
            .values()
            .find(|intent| intent.gateway_token.as_deref() == Some(token))
            .cloned())
    }

    async fn record_gateway_status(
        &self,
        order: &CommerceOrder,
        raw: &serde_json::Value,
    ) -> Result<bool, DomainError> {
        let mut intents = self.intents.write().await;
        match intents.get_mut(order.as_str()) {
            Some(intent) => {
                intent.raw_gateway_status = Some(raw.clone());
                intent.updated_at = Timestamp::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transition_status(&self, order: &CommerceOrder, target: IntentStatus) -> Result<bool, DomainError> {
        let mut intents = self.intents.write().await;
        let Some(intent) = intents.get_mut(order.as_str()) else {
            return Ok(false);
        };
        // A disallowed transition leaves the row untouched, like the
        // conditional update in SQL.
        Ok(intent.apply_status(target, Timestamp::now()).unwrap_or(false))
    }
}
