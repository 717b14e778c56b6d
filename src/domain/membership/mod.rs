//! Membership domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Membership record and the activity rule
//! - `plan` - Static plan catalog (price, duration, tier)
//! - `status` - Stored membership status
//! - `tier` - Access tiers derived from plans

mod aggregate;
mod plan;
mod status;
mod tier;

pub use aggregate::Membership;
pub use plan::{canonical_plan_id, duration_days_of, tier_of, Plan, CURRENCY, FALLBACK_DURATION_DAYS};
pub use status::MembershipStatus;
pub use tier::MembershipTier;
