//! In-memory payment audit trail and settlement ledger.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::checkout::CommerceOrder;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{PaymentAuditRepository, PaymentRecord};

#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentAuditRepository {
    records: Arc<RwLock<HashMap<String, PaymentRecord>>>,
    settlements: Arc<RwLock<HashSet<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryPaymentAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails audit writes only; settlement claims keep working.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn get(&self, gateway_order_id: &str) -> Option<PaymentRecord> {
        self.records.read().await.get(gateway_order_id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_settled(&self, settlement_key: &str) -> bool {
        self.settlements.read().await.contains(settlement_key)
    }
}

#[async_trait]
impl PaymentAuditRepository for InMemoryPaymentAuditRepository {
    async fn record(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(ErrorCode::DatabaseError, "audit store unavailable"));
        }
        self.records
            .write()
            .await
            .insert(record.gateway_order_id.clone(), record.clone());
        Ok(())
    }

    async fn claim_settlement(
        &self,
        settlement_key: &str,
        _commerce_order: Option<&CommerceOrder>,
        _at: Timestamp,
    ) -> Result<bool, DomainError> {
        Ok(self.settlements.write().await.insert(settlement_key.to_string()))
    }

    async fn release_settlement(&self, settlement_key: &str) -> Result<(), DomainError> {
        self.settlements.write().await.remove(settlement_key);
        Ok(())
    }
}
