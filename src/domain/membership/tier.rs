//! Membership tier definitions.
//!
//! Tiers gate which content a membership unlocks. They are never chosen
//! directly; the plan catalog derives them from the purchased plan.

use serde::{Deserialize, Serialize};

/// Access level granted by a membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    /// Entry tier. Also the fallback for plans the catalog does not know.
    #[default]
    Basic,

    /// Full access tier sold with the longer plans.
    Pro,
}

impl MembershipTier {
    /// Stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Basic => "basic",
            MembershipTier::Pro => "pro",
        }
    }

    /// Parses a stored tier value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(MembershipTier::Basic),
            "pro" => Some(MembershipTier::Pro),
            _ => None,
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            MembershipTier::Basic => "Basic",
            MembershipTier::Pro => "Pro",
        }
    }

    /// Higher rank unlocks more content.
    pub fn rank(&self) -> u8 {
        match self {
            MembershipTier::Basic => 1,
            MembershipTier::Pro => 2,
        }
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
