//! Payment pipeline error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::ports::PaymentError;

/// Errors from settling a payment (push or pull path).
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Gateway unreachable or answered with an error after the retry.
    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(PaymentError),

    /// Paid, but plan or email could not be resolved from any source.
    /// Needs manual reconciliation.
    #[error("Paid order {commerce_order} is missing {missing}")]
    DataIncomplete {
        commerce_order: String,
        missing: &'static str,
    },

    /// No intent and no token to query the gateway with.
    #[error("No payment intent for order {0}")]
    IntentNotFound(String),

    /// The gateway, the caller and the stored intent name different orders.
    #[error("Commerce order mismatch: expected {expected}, got {reported}")]
    OrderMismatch { expected: String, reported: String },

    /// The token was not issued for the checkout it was presented with.
    #[error("Token does not belong to order {0}")]
    TokenMismatch(String),

    /// Authoritative write failed; the next settlement attempt retries it.
    #[error("Persistence failure: {0}")]
    Persistence(DomainError),
}

impl From<PaymentError> for PipelineError {
    fn from(err: PaymentError) -> Self {
        PipelineError::GatewayUnavailable(err)
    }
}

impl From<DomainError> for PipelineError {
    fn from(err: DomainError) -> Self {
        PipelineError::Persistence(err)
    }
}

/// Errors from opening a checkout.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] ValidationError),

    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(#[from] PaymentError),
}

/// Errors from accepting an inbound gateway notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Notification carries no token")]
    MissingToken,

    #[error("Notification signature does not match")]
    InvalidSignature,
}
