//! PostgreSQL implementation of IntentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::checkout::{CommerceOrder, IntentStatus, PaymentIntent};
use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp};
use crate::ports::IntentRepository;

pub struct PostgresIntentRepository {
    pool: PgPool,
}

impl PostgresIntentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_INTENT: &str = r#"
    SELECT commerce_order, plan_id, email, user_id, gateway_token, gateway_order_id,
           status, raw_status, created_at, updated_at
    FROM payment_intents
"#;

#[derive(Debug, sqlx::FromRow)]
struct IntentRow {
    commerce_order: String,
    plan_id: String,
    email: String,
    user_id: Option<String>,
    gateway_token: Option<String>,
    gateway_order_id: Option<String>,
    status: String,
    raw_status: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IntentRow> for PaymentIntent {
    type Error = DomainError;

    fn try_from(row: IntentRow) -> Result<Self, Self::Error> {
        let invalid = |what: &str, e: String| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored {}: {}", what, e))
        };

        Ok(PaymentIntent {
            commerce_order: CommerceOrder::parse(&row.commerce_order)
                .map_err(|e| invalid("commerce_order", e.to_string()))?,
            plan_id: row.plan_id,
            email: EmailAddress::parse(&row.email).map_err(|e| invalid("email", e.to_string()))?,
            user_id: row.user_id,
            gateway_token: row.gateway_token,
            gateway_order_id: row.gateway_order_id,
            status: IntentStatus::parse(&row.status).ok_or_else(|| invalid("status", row.status.clone()))?,
            raw_gateway_status: row.raw_status,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl IntentRepository for PostgresIntentRepository {
    async fn save(&self, intent: &PaymentIntent) -> Result<(), DomainError> {
        // A paid row keeps its status even if an older copy is saved over it.
        sqlx::query(
            r#"
            INSERT INTO payment_intents (
                commerce_order, plan_id, email, user_id, gateway_token, gateway_order_id,
                status, raw_status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (commerce_order) DO UPDATE SET
                plan_id = EXCLUDED.plan_id,
                email = EXCLUDED.email,
                user_id = EXCLUDED.user_id,
                gateway_token = EXCLUDED.gateway_token,
                gateway_order_id = EXCLUDED.gateway_order_id,
                status = CASE
                    WHEN payment_intents.status = 'paid' THEN payment_intents.status
                    ELSE EXCLUDED.status
                END,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(intent.commerce_order.as_str())
        .bind(&intent.plan_id)
        .bind(intent.email.as_str())
        .bind(&intent.user_id)
        .bind(&intent.gateway_token)
        .bind(&intent.gateway_order_id)
        .bind(intent.status.as_str())
        .bind(&intent.raw_gateway_status)
        .bind(intent.created_at.as_datetime())
        .bind(intent.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save payment intent", e))?;

        Ok(())
    }

    async fn find_by_commerce_order(&self, order: &CommerceOrder) -> Result<Option<PaymentIntent>, DomainError> {
        let row: Option<IntentRow> = sqlx::query_as(&format!("{} WHERE commerce_order = $1", SELECT_INTENT))
            .bind(order.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch payment intent", e))?;

        row.map(PaymentIntent::try_from).transpose()
    }

    async fn find_by_gateway_token(&self, token: &str) -> Result<Option<PaymentIntent>, DomainError> {
        let row: Option<IntentRow> = sqlx::query_as(&format!(
            "{} WHERE gateway_token = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_INTENT
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch payment intent by token", e))?;

        row.map(PaymentIntent::try_from).transpose()
    }

    async fn record_gateway_status(
        &self,
        order: &CommerceOrder,
        raw: &serde_json::Value,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_intents
            SET raw_status = $2, updated_at = NOW()
            WHERE commerce_order = $1
            "#,
        )
        .bind(order.as_str())
        .bind(raw)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to record gateway status", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn transition_status(&self, order: &CommerceOrder, target: IntentStatus) -> Result<bool, DomainError> {
        let sources: Vec<String> = IntentStatus::sources_of(target)
            .into_iter()
            .filter(|source| *source != target)
            .map(|source| source.as_str().to_string())
            .collect();

        let result = sqlx::query(
            r#"
            UPDATE payment_intents
            SET status = $2, updated_at = NOW()
            WHERE commerce_order = $1 AND status = ANY($3)
            "#,
        )
        .bind(order.as_str())
        .bind(target.as_str())
        .bind(sources)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update payment intent status", e))?;

        Ok(result.rows_affected() > 0)
    }
}
