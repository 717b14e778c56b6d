//! PostgreSQL payment audit trail and settlement ledger.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::checkout::CommerceOrder;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{PaymentAuditRepository, PaymentRecord};

pub struct PostgresPaymentAuditRepository {
    pool: PgPool,
}

impl PostgresPaymentAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentAuditRepository for PostgresPaymentAuditRepository {
    async fn record(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (gateway_order_id, commerce_order, status, raw, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (gateway_order_id) DO UPDATE SET
                commerce_order = COALESCE(EXCLUDED.commerce_order, payments.commerce_order),
                status = EXCLUDED.status,
                raw = EXCLUDED.raw,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&record.gateway_order_id)
        .bind(record.commerce_order.as_ref().map(|order| order.as_str()))
        .bind(&record.status)
        .bind(&record.raw)
        .bind(record.recorded_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to record payment", e))?;

        Ok(())
    }

    async fn claim_settlement(
        &self,
        settlement_key: &str,
        commerce_order: Option<&CommerceOrder>,
        at: Timestamp,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payment_settlements (settlement_key, commerce_order, settled_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (settlement_key) DO NOTHING
            "#,
        )
        .bind(settlement_key)
        .bind(commerce_order.map(|order| order.as_str()))
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to claim settlement", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_settlement(&self, settlement_key: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM payment_settlements WHERE settlement_key = $1")
            .bind(settlement_key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to release settlement", e))?;

        Ok(())
    }
}
