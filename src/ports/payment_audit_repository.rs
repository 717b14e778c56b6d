//! Payment audit trail and settlement ledger port.
//!
//! One row per gateway order with the last status seen. The trail is
//! informational only; intents and memberships decide access.
//!
//! The settlement ledger is separate: one claim per paid gateway payment,
//! taken before the membership is written. Whoever takes the claim owns the
//! activation and the welcome email for that payment.

use async_trait::async_trait;

use crate::domain::checkout::CommerceOrder;
use crate::domain::foundation::{DomainError, Timestamp};

/// Last known state of a gateway order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub gateway_order_id: String,
    pub commerce_order: Option<CommerceOrder>,
    pub status: String,
    pub raw: serde_json::Value,
    pub recorded_at: Timestamp,
}

#[async_trait]
pub trait PaymentAuditRepository: Send + Sync {
    /// Upserts the record keyed by gateway order id.
    async fn record(&self, record: &PaymentRecord) -> Result<(), DomainError>;

    /// Claims the settlement of one paid payment.
    ///
    /// Insert-if-absent: returns `true` for exactly one caller per key, even
    /// under concurrent calls.
    async fn claim_settlement(
        &self,
        settlement_key: &str,
        commerce_order: Option<&CommerceOrder>,
        at: Timestamp,
    ) -> Result<bool, DomainError>;

    /// Gives back a claim whose activation could not be written.
    async fn release_settlement(&self, settlement_key: &str) -> Result<(), DomainError>;
}
