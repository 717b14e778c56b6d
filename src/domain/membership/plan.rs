//! Plan catalog.
//!
//! The catalog is static: every plan has a price in the single supported
//! currency, an optional fixed duration and the tier it unlocks. Plan ids
//! from older checkouts used Spanish names, so those resolve as aliases.
//!
//! `tier_of` and `duration_days_of` are total. Activation must never fail
//! because a plan id is unfamiliar, so unknown ids fall back to the basic
//! tier and the shortest duration.

use super::MembershipTier;
use crate::domain::foundation::Timestamp;

/// Currency every plan is priced in.
pub const CURRENCY: &str = "CLP";

/// Duration applied to plan ids missing from the catalog.
pub const FALLBACK_DURATION_DAYS: i64 = 30;

/// A purchasable membership plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Canonical identifier stored on intents and memberships.
    pub id: &'static str,
    pub label: &'static str,
    /// Price in whole currency units.
    pub amount: i64,
    /// `None` for plans that never expire.
    pub duration_days: Option<i64>,
    pub tier: MembershipTier,
    aliases: &'static [&'static str],
}

static PLANS: [Plan; 4] = [
    Plan {
        id: "monthly",
        label: "Mensual",
        amount: 19_990,
        duration_days: Some(30),
        tier: MembershipTier::Basic,
        aliases: &["mensual"],
    },
    Plan {
        id: "quarterly",
        label: "Trimestral",
        amount: 44_990,
        duration_days: Some(120),
        tier: MembershipTier::Pro,
        aliases: &["trimestral"],
    },
    Plan {
        id: "annual",
        label: "Anual",
        amount: 99_990,
        duration_days: Some(365),
        tier: MembershipTier::Pro,
        aliases: &["anual", "yearly"],
    },
    Plan {
        id: "lifetime",
        label: "Vitalicio",
        amount: 249_990,
        duration_days: None,
        tier: MembershipTier::Pro,
        aliases: &["vitalicio"],
    },
];

impl Plan {
    /// Looks a plan up by canonical id or alias, ignoring case.
    pub fn find(plan_id: &str) -> Option<&'static Plan> {
        let needle = plan_id.trim().to_ascii_lowercase();
        PLANS
            .iter()
            .find(|plan| plan.id == needle || plan.aliases.iter().any(|alias| *alias == needle))
    }

    /// All plans, in display order.
    pub fn all() -> &'static [Plan] {
        &PLANS
    }

    /// Expiry for a membership of this plan starting at `start_at`.
    pub fn end_at(&self, start_at: &Timestamp) -> Option<Timestamp> {
        self.duration_days.map(|days| start_at.add_days(days))
    }
}

/// Tier unlocked by `plan_id`; unknown plans get the default tier.
pub fn tier_of(plan_id: &str) -> MembershipTier {
    Plan::find(plan_id).map(|plan| plan.tier).unwrap_or_default()
}

/// Duration in days, `None` for non-expiring plans.
pub fn duration_days_of(plan_id: &str) -> Option<i64> {
    match Plan::find(plan_id) {
        Some(plan) => plan.duration_days,
        None => Some(FALLBACK_DURATION_DAYS),
    }
}

/// Canonical id for a known plan, otherwise the trimmed input.
pub fn canonical_plan_id(plan_id: &str) -> String {
    Plan::find(plan_id)
        .map(|plan| plan.id.to_string())
        .unwrap_or_else(|| plan_id.trim().to_string())
}
