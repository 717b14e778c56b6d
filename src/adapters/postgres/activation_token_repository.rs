//! PostgreSQL activation token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::ActivationToken;
use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp};
use crate::ports::{ActivationTokenRepository, ConsumeOutcome};

pub struct PostgresActivationTokenRepository {
    pool: PgPool,
}

impl PostgresActivationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivationTokenRepository for PostgresActivationTokenRepository {
    async fn insert(&self, token: &ActivationToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO activation_tokens (token, email, created_at, used_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(&token.token)
        .bind(token.email.as_str())
        .bind(token.created_at.as_datetime())
        .bind(token.used_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert activation token", e))?;

        Ok(())
    }

    async fn consume(&self, token: &str, at: Timestamp) -> Result<ConsumeOutcome, DomainError> {
        // The `used_at IS NULL` guard makes the claim atomic.
        let claimed: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE activation_tokens
            SET used_at = $2
            WHERE token = $1 AND used_at IS NULL
            RETURNING email
            "#,
        )
        .bind(token)
        .bind(at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to consume activation token", e))?;

        if let Some(email) = claimed {
            let email = EmailAddress::parse(&email).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored email: {}", e))
            })?;
            return Ok(ConsumeOutcome::Consumed(email));
        }

        let used_at: Option<Option<DateTime<Utc>>> =
            sqlx::query_scalar("SELECT used_at FROM activation_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to look up activation token", e))?;

        Ok(match used_at {
            Some(_) => ConsumeOutcome::AlreadyUsed,
            None => ConsumeOutcome::NotFound,
        })
    }
}
