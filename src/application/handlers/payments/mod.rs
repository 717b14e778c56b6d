//! Payment handlers.
//!
//! ## Commands
//! - Creating a checkout with the gateway
//! - Settling a payment from a gateway notification (push path)
//! - Settling a payment when the payer returns (pull path)
//!
//! Both settlement paths share `SettlePaymentHandler`.

mod confirm_payment;
mod create_checkout;
mod errors;
mod reconcile_return;
mod settle_payment;

pub use confirm_payment::{AcceptedNotification, ConfirmPaymentCommand, ConfirmPaymentHandler, TOKEN_PARAM};
pub use create_checkout::{
    CheckoutSettings, CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult, CONFIRMATION_PATH,
    DEFAULT_RETURN_PATH,
};
pub use errors::{CheckoutError, NotificationError, PipelineError};
pub use reconcile_return::{ReconcileReturnCommand, ReconcileReturnHandler, ReconcileReturnResult};
pub use settle_payment::{SettlePaymentCommand, SettlePaymentHandler, SettlePaymentResult, SettlementSource};
