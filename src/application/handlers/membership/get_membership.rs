//! GetMembershipHandler - Query handler for a customer's membership.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EmailAddress, Timestamp};
use crate::domain::membership::Membership;
use crate::ports::MembershipRepository;

/// Query to get the membership stored for an email.
#[derive(Debug, Clone)]
pub struct GetMembershipQuery {
    pub email: EmailAddress,
}

/// Stored membership and whether it grants access right now.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMembershipResult {
    pub membership: Option<Membership>,
    pub active: bool,
}

/// Handler for reading a membership.
///
/// `active` uses the strict rule: status `active` and not yet expired.
pub struct GetMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
}

impl GetMembershipHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetMembershipQuery) -> Result<GetMembershipResult, DomainError> {
        let membership = self.repository.find_by_email(&query.email).await?;
        let now = Timestamp::now();
        let active = membership.as_ref().is_some_and(|m| m.is_active(&now));
        Ok(GetMembershipResult { membership, active })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMembershipRepository;
    use crate::domain::membership::MembershipStatus;

    fn email() -> EmailAddress {
        EmailAddress::parse("a@x.com").unwrap()
    }

    #[tokio::test]
    async fn returns_none_when_no_membership() {
        let handler = GetMembershipHandler::new(Arc::new(InMemoryMembershipRepository::new()));

        let result = handler.handle(GetMembershipQuery { email: email() }).await.unwrap();

        assert!(result.membership.is_none());
        assert!(!result.active);
    }

    #[tokio::test]
    async fn reports_active_membership() {
        let repo = Arc::new(InMemoryMembershipRepository::new());
        repo.upsert(&Membership::activate(email(), "monthly", Timestamp::now()))
            .await
            .unwrap();
        let handler = GetMembershipHandler::new(repo);

        let result = handler.handle(GetMembershipQuery { email: email() }).await.unwrap();

        assert!(result.active);
        assert_eq!(result.membership.map(|m| m.plan_id), Some("monthly".to_string()));
    }

    #[tokio::test]
    async fn expired_membership_is_returned_but_inactive() {
        let repo = Arc::new(InMemoryMembershipRepository::new());
        let start = Timestamp::now().add_days(-45);
        repo.upsert(&Membership::activate(email(), "monthly", start)).await.unwrap();
        let handler = GetMembershipHandler::new(repo);

        let result = handler.handle(GetMembershipQuery { email: email() }).await.unwrap();

        assert!(result.membership.is_some());
        assert!(!result.active);
    }

    #[tokio::test]
    async fn canceled_membership_is_inactive() {
        let repo = Arc::new(InMemoryMembershipRepository::new());
        let mut membership = Membership::activate(email(), "annual", Timestamp::now());
        membership.status = MembershipStatus::Canceled;
        repo.upsert(&membership).await.unwrap();
        let handler = GetMembershipHandler::new(repo);

        let result = handler.handle(GetMembershipQuery { email: email() }).await.unwrap();

        assert!(!result.active);
    }
}
