//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers take their ports as `Arc<dyn Trait>` and hold no other state.

pub mod handlers;

pub use handlers::{
    // Payments
    CheckoutSettings, ConfirmPaymentHandler, CreateCheckoutHandler, ReconcileReturnHandler, SettlePaymentHandler,
    // Membership
    ActivateMembershipHandler, GetMembershipHandler,
    // Account
    LoginHandler, ProvisionAccountHandler, SetPasswordHandler,
};
