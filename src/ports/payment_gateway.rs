//! Payment gateway port.
//!
//! The service talks to a single external gateway with a fixed contract:
//! create a payment, redirect the payer, receive a notification, query the
//! payment status. Only the two outbound calls live behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::CommerceOrder;
use crate::domain::foundation::EmailAddress;
use crate::domain::gateway::GatewayPaymentStatus;

/// Port for the external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a payment session for a checkout.
    ///
    /// The intent must not be treated as accepted unless this returns `Ok`.
    async fn create_payment(&self, request: CreatePaymentRequest) -> Result<CreatedPayment, PaymentError>;

    /// Fetches the current status of the payment behind `token`.
    async fn get_status(&self, token: &str) -> Result<PaymentStatusReport, PaymentError>;
}

/// Request to open a payment session.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentRequest {
    pub commerce_order: CommerceOrder,
    pub subject: String,
    /// Whole currency units.
    pub amount: i64,
    pub currency: String,
    pub email: EmailAddress,
    /// Where the gateway posts the asynchronous notification.
    pub notify_url: String,
    /// Where the payer's browser is sent afterwards.
    pub return_url: String,
    /// Free-form JSON the gateway stores with the payment.
    pub optional: Option<String>,
}

/// Payment session opened by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPayment {
    pub token: String,
    /// Checkout page; the payer goes to `{redirect_url}?token={token}`.
    pub redirect_url: String,
    pub gateway_order_id: Option<String>,
}

impl CreatedPayment {
    /// Full URL the payer is redirected to.
    pub fn checkout_url(&self) -> String {
        format!("{}?token={}", self.redirect_url, self.token)
    }
}

/// Answer to a status query.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStatusReport {
    pub status: GatewayPaymentStatus,
    pub commerce_order: Option<CommerceOrder>,
    pub gateway_order_id: Option<String>,
    /// Payer email as recorded by the gateway, used as a last resort.
    pub payer_email: Option<String>,
    /// Full response body, kept for audit.
    pub raw: serde_json::Value,
}

/// Errors from gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// HTTP status returned by the gateway, if any.
    pub http_status: Option<u16>,
    /// Whether a retry may succeed.
    pub retryable: bool,
}

/// Payment error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network failure or timeout before a response arrived.
    NetworkError,
    /// Gateway answered with a 5xx.
    UpstreamError,
    /// Gateway refused the request (4xx).
    Rejected,
    /// Response body could not be understood.
    InvalidResponse,
    /// Request could not be built (signing failure, bad base URL).
    Configuration,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError | PaymentErrorCode::UpstreamError)
    }
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            http_status: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Error for a non-2xx response.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        let code = if status >= 500 {
            PaymentErrorCode::UpstreamError
        } else {
            PaymentErrorCode::Rejected
        };
        let mut err = Self::new(code, format!("Gateway returned {}: {}", status, body.into()));
        err.http_status = Some(status);
        err
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Configuration, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}
