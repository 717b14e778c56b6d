//! Membership status.

use serde::{Deserialize, Serialize};

/// Stored status of a membership row.
///
/// Only `Active` can grant access; an active row still expires once
/// `end_at` passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Canceled,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Canceled => "canceled",
        }
    }

    /// Parses a stored status. Accepts the British spelling found in older rows.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(MembershipStatus::Active),
            "canceled" | "cancelled" => Some(MembershipStatus::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
