//! Payment intent store port.
//!
//! Intents are never deleted. Status updates are conditional on the stored
//! status so that a `paid` intent stays `paid` no matter how many writers
//! race on it.

use async_trait::async_trait;

use crate::domain::checkout::{CommerceOrder, IntentStatus, PaymentIntent};
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait IntentRepository: Send + Sync {
    /// Inserts the intent, or overwrites the row with the same commerce order.
    async fn save(&self, intent: &PaymentIntent) -> Result<(), DomainError>;

    async fn find_by_commerce_order(&self, order: &CommerceOrder) -> Result<Option<PaymentIntent>, DomainError>;

    async fn find_by_gateway_token(&self, token: &str) -> Result<Option<PaymentIntent>, DomainError>;

    /// Stores the latest gateway status payload against the intent.
    ///
    /// Returns `false` when no intent has that commerce order.
    async fn record_gateway_status(
        &self,
        order: &CommerceOrder,
        raw: &serde_json::Value,
    ) -> Result<bool, DomainError>;

    /// Moves the intent to `target` if the state machine allows it from the
    /// stored status.
    ///
    /// Returns `true` only when this call changed the stored status, so at
    /// most one concurrent caller observes the transition into `paid`.
    async fn transition_status(&self, order: &CommerceOrder, target: IntentStatus) -> Result<bool, DomainError>;
}
