//! PostgreSQL credential store (`users_auth`).

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::account::{Credentials, PasswordHash};
use crate::domain::foundation::{DomainError, EmailAddress};
use crate::ports::CredentialRepository;

pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    pass_hash: String,
    pass_salt: String,
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn upsert(&self, credentials: &Credentials) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users_auth (email, pass_hash, pass_salt)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                pass_hash = EXCLUDED.pass_hash,
                pass_salt = EXCLUDED.pass_salt
            "#,
        )
        .bind(credentials.email.as_str())
        .bind(&credentials.password.hash_hex)
        .bind(&credentials.password.salt_hex)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to store credentials", e))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credentials>, DomainError> {
        let row: Option<CredentialRow> =
            sqlx::query_as("SELECT pass_hash, pass_salt FROM users_auth WHERE email = $1")
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch credentials", e))?;

        Ok(row.map(|row| Credentials {
            email: email.clone(),
            password: PasswordHash {
                hash_hex: row.pass_hash,
                salt_hex: row.pass_salt,
            },
        }))
    }
}
