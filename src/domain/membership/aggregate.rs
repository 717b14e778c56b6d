//! Membership aggregate.
//!
//! One row per customer email; the latest activation wins.

use serde::{Deserialize, Serialize};

use super::plan::{canonical_plan_id, duration_days_of, tier_of};
use super::{MembershipStatus, MembershipTier};
use crate::domain::foundation::{EmailAddress, Timestamp};

/// A customer's membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub email: EmailAddress,
    pub plan_id: String,
    pub tier: MembershipTier,
    pub status: MembershipStatus,
    pub start_at: Timestamp,
    /// `None` means the membership never expires.
    pub end_at: Option<Timestamp>,
    pub cancel_at_period_end: bool,
}

impl Membership {
    /// Builds the active membership a confirmed payment of `plan_id` grants.
    ///
    /// Tier and expiry derive from the plan alone, so the same inputs always
    /// produce the same record.
    pub fn activate(email: EmailAddress, plan_id: &str, start_at: Timestamp) -> Self {
        let end_at = duration_days_of(plan_id).map(|days| start_at.add_days(days));
        Self {
            email,
            plan_id: canonical_plan_id(plan_id),
            tier: tier_of(plan_id),
            status: MembershipStatus::Active,
            start_at,
            end_at,
            cancel_at_period_end: false,
        }
    }

    /// Active status and not yet expired.
    pub fn is_active(&self, now: &Timestamp) -> bool {
        self.status == MembershipStatus::Active && !Self::is_expired(self.end_at.as_ref(), now)
    }

    /// Legacy activity rule for rows that predate the status column.
    ///
    /// A row with no recorded status counts as active when it names a plan or
    /// tier and has not expired. Rows with a status always use the strict rule.
    pub fn is_active_lenient(
        status: Option<MembershipStatus>,
        has_plan_or_tier: bool,
        end_at: Option<&Timestamp>,
        now: &Timestamp,
    ) -> bool {
        let status_allows = match status {
            Some(status) => status == MembershipStatus::Active,
            None => has_plan_or_tier,
        };
        status_allows && !Self::is_expired(end_at, now)
    }

    fn is_expired(end_at: Option<&Timestamp>, now: &Timestamp) -> bool {
        match end_at {
            Some(end) => !end.is_after(now),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailAddress {
        EmailAddress::parse("a@x.com").unwrap()
    }

    #[test]
    fn monthly_activation_expires_after_thirty_days() {
        let start = Timestamp::now();
        let membership = Membership::activate(email(), "monthly", start);

        assert_eq!(membership.plan_id, "monthly");
        assert_eq!(membership.tier, MembershipTier::Basic);
        assert_eq!(membership.status, MembershipStatus::Active);
        assert_eq!(membership.end_at, Some(start.add_days(30)));
        assert!(!membership.cancel_at_period_end);
    }

    #[test]
    fn lifetime_activation_is_active_far_in_the_future() {
        let start = Timestamp::now();
        let membership = Membership::activate(email(), "lifetime", start);

        assert_eq!(membership.end_at, None);
        assert!(membership.is_active(&start.add_days(365 * 80)));
    }

    #[test]
    fn alias_is_stored_under_canonical_id() {
        let membership = Membership::activate(email(), "trimestral", Timestamp::now());
        assert_eq!(membership.plan_id, "quarterly");
        assert_eq!(membership.tier, MembershipTier::Pro);
    }

    #[test]
    fn unknown_plan_activates_with_default_tier() {
        let start = Timestamp::now();
        let membership = Membership::activate(email(), "mystery", start);
        assert_eq!(membership.tier, MembershipTier::Basic);
        assert_eq!(membership.end_at, Some(start.add_days(30)));
        assert!(membership.is_active(&start));
    }

    #[test]
    fn activation_is_deterministic() {
        let start = Timestamp::now();
        assert_eq!(
            Membership::activate(email(), "annual", start),
            Membership::activate(email(), "annual", start)
        );
    }

    #[test]
    fn expired_membership_is_inactive() {
        let start = Timestamp::now();
        let membership = Membership::activate(email(), "monthly", start);
        assert!(membership.is_active(&start.add_days(29)));
        assert!(!membership.is_active(&start.add_days(30)));
    }

    #[test]
    fn canceled_membership_is_inactive_before_expiry() {
        let start = Timestamp::now();
        let mut membership = Membership::activate(email(), "annual", start);
        membership.status = MembershipStatus::Canceled;
        assert!(!membership.is_active(&start));
    }

    #[test]
    fn lenient_rule_accepts_statusless_rows_with_plan() {
        let now = Timestamp::now();
        assert!(Membership::is_active_lenient(None, true, None, &now));
        assert!(!Membership::is_active_lenient(None, false, None, &now));
        assert!(!Membership::is_active_lenient(
            None,
            true,
            Some(&now.add_days(-1)),
            &now
        ));
    }

    #[test]
    fn lenient_rule_is_strict_when_status_present() {
        let now = Timestamp::now();
        assert!(!Membership::is_active_lenient(
            Some(MembershipStatus::Canceled),
            true,
            None,
            &now
        ));
        assert!(Membership::is_active_lenient(
            Some(MembershipStatus::Active),
            false,
            None,
            &now
        ));
    }
}
