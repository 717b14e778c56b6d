//! In-memory membership store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode};
use crate::domain::membership::Membership;
use crate::ports::MembershipRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipRepository {
    memberships: Arc<RwLock<HashMap<String, Membership>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent upsert fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn count(&self) -> usize {
        self.memberships.read().await.len()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn upsert(&self, membership: &Membership) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(ErrorCode::DatabaseError, "membership store unavailable"));
        }

        let mut memberships = self.memberships.write().await;
        let mut stored = membership.clone();
        stored.cancel_at_period_end = false;
        memberships.insert(membership.email.as_str().to_string(), stored);
        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Membership>, DomainError> {
        Ok(self.memberships.read().await.get(email.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn email() -> EmailAddress {
        EmailAddress::parse("a@x.com").unwrap()
    }

    #[tokio::test]
    async fn upsert_overwrites_by_email() {
        let repo = InMemoryMembershipRepository::new();
        let start = Timestamp::now();
        repo.upsert(&Membership::activate(email(), "monthly", start)).await.unwrap();
        repo.upsert(&Membership::activate(email(), "annual", start)).await.unwrap();

        assert_eq!(repo.count().await, 1);
        let stored = repo.find_by_email(&email()).await.unwrap().unwrap();
        assert_eq!(stored.plan_id, "annual");
    }

    #[tokio::test]
    async fn failing_writes_surface_database_error() {
        let repo = InMemoryMembershipRepository::new();
        repo.set_fail_writes(true);

        let err = repo
            .upsert(&Membership::activate(email(), "monthly", Timestamp::now()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(repo.count().await, 0);
    }
}
