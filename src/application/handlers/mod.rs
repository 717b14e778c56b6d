//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod membership;
pub mod payments;

pub use account::{
    EmailOutcome, LoginCommand, LoginHandler, LoginResult, ProvisionAccountCommand, ProvisionAccountHandler,
    ProvisionAccountResult, SetPasswordCommand, SetPasswordHandler, SetPasswordResult,
};
pub use membership::{
    ActivateMembershipCommand, ActivateMembershipHandler, ActivateMembershipResult, GetMembershipHandler,
    GetMembershipQuery, GetMembershipResult,
};
pub use payments::{
    AcceptedNotification, CheckoutError, CheckoutSettings, ConfirmPaymentCommand, ConfirmPaymentHandler,
    CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult, NotificationError, PipelineError,
    ReconcileReturnCommand, ReconcileReturnHandler, ReconcileReturnResult, SettlePaymentCommand,
    SettlePaymentHandler, SettlePaymentResult, SettlementSource,
};
