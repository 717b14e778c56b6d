//! Membership repository port.
//!
//! Memberships are keyed by normalized email. Writes are upserts: the last
//! activation for an email overwrites plan, tier, status and period.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress};
use crate::domain::membership::Membership;

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Inserts the membership or overwrites the row for the same email,
    /// clearing `cancel_at_period_end`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, membership: &Membership) -> Result<(), DomainError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Membership>, DomainError>;
}
