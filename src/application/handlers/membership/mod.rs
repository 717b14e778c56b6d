//! Membership handlers.
//!
//! ## Commands
//! - Activating a membership for a confirmed payment
//!
//! ## Queries
//! - Get membership details

mod activate_membership;
mod get_membership;

// Commands
pub use activate_membership::{ActivateMembershipCommand, ActivateMembershipHandler, ActivateMembershipResult};

// Queries
pub use get_membership::{GetMembershipHandler, GetMembershipQuery, GetMembershipResult};
