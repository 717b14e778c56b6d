//! PostgreSQL implementation of MembershipRepository.
//!
//! One row per email. Activation is a single `INSERT ... ON CONFLICT (email)
//! DO UPDATE`, so concurrent activations for the same customer converge on
//! one row instead of racing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp};
use crate::domain::membership::{tier_of, Membership, MembershipStatus, MembershipTier};
use crate::ports::MembershipRepository;

pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership.
///
/// `status` and `tier` are nullable because rows imported from the first
/// version of the table carry neither.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    email: String,
    plan_id: Option<String>,
    tier: Option<String>,
    status: Option<String>,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    cancel_at_period_end: Option<bool>,
}

fn membership_from_row(row: MembershipRow, now: &Timestamp) -> Result<Membership, DomainError> {
    let email = EmailAddress::parse(&row.email)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored email: {}", e)))?;

    let stored_status = match row.status.as_deref() {
        Some(raw) => Some(MembershipStatus::parse(raw).ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status value: {}", raw))
        })?),
        None => None,
    };
    let end_at = row.end_at.map(Timestamp::from_datetime);

    let status = match stored_status {
        Some(status) => status,
        None => {
            let has_plan_or_tier = row.plan_id.is_some() || row.tier.is_some();
            let active = Membership::is_active_lenient(None, has_plan_or_tier, end_at.as_ref(), now);
            tracing::warn!(
                email = %email,
                inferred_active = active,
                "Membership row has no status, applying legacy activity rule"
            );
            if active {
                MembershipStatus::Active
            } else {
                MembershipStatus::Canceled
            }
        }
    };

    let plan_id = row.plan_id.unwrap_or_default();
    let tier = row
        .tier
        .as_deref()
        .and_then(MembershipTier::parse)
        .unwrap_or_else(|| tier_of(&plan_id));

    Ok(Membership {
        email,
        plan_id,
        tier,
        status,
        start_at: row.start_at.map(Timestamp::from_datetime).unwrap_or(*now),
        end_at,
        cancel_at_period_end: row.cancel_at_period_end.unwrap_or(false),
    })
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn upsert(&self, membership: &Membership) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO memberships (
                email, plan_id, tier, status, start_at, end_at, cancel_at_period_end, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, false, NOW())
            ON CONFLICT (email) DO UPDATE SET
                plan_id = EXCLUDED.plan_id,
                tier = EXCLUDED.tier,
                status = EXCLUDED.status,
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                cancel_at_period_end = false,
                updated_at = NOW()
            "#,
        )
        .bind(membership.email.as_str())
        .bind(&membership.plan_id)
        .bind(membership.tier.as_str())
        .bind(membership.status.as_str())
        .bind(membership.start_at.as_datetime())
        .bind(membership.end_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to upsert membership", e))?;

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Membership>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT email, plan_id, tier, status, start_at, end_at, cancel_at_period_end
            FROM memberships
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch membership", e))?;

        row.map(|r| membership_from_row(r, &Timestamp::now())).transpose()
    }
}
