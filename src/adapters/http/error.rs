//! API error responses.
//!
//! Every failing endpoint answers with `ErrorResponse` as JSON. Error codes
//! are snake_case strings the front end matches on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::handlers::{CheckoutError, NotificationError, PipelineError};
use crate::domain::account::AccountError;
use crate::domain::foundation::DomainError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub ok: bool,
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(error_code: impl Into<String>, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..Self::new(error_code, message)
        }
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(error_code, message),
        }
    }

    pub fn bad_request(error_code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_code, message)
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        error!(error = %err, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::internal(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::UnknownPlan(_) => Self::bad_request("invalid_plan", err.to_string()),
            CheckoutError::InvalidEmail(_) => Self::bad_request("email_required", err.to_string()),
            CheckoutError::GatewayUnavailable(_) => Self::new(
                StatusCode::BAD_GATEWAY,
                "gateway_unavailable",
                "Payment gateway unavailable",
            ),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::IntentNotFound(order) => Self {
                status: StatusCode::NOT_FOUND,
                body: ErrorResponse::with_details(
                    "intent_not_found",
                    "No payment found for this order",
                    serde_json::json!({ "commerceOrder": order }),
                ),
            },
            PipelineError::DataIncomplete {
                commerce_order,
                missing,
            } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ErrorResponse::with_details(
                    "data_incomplete",
                    "Payment received but could not be matched to a plan; support will follow up",
                    serde_json::json!({ "commerceOrder": commerce_order, "missing": missing }),
                ),
            },
            PipelineError::OrderMismatch { expected, reported } => Self {
                status: StatusCode::CONFLICT,
                body: ErrorResponse::with_details(
                    "order_mismatch",
                    "Payment does not belong to this order",
                    serde_json::json!({ "commerceOrder": expected, "reportedOrder": reported }),
                ),
            },
            PipelineError::TokenMismatch(order) => Self {
                status: StatusCode::CONFLICT,
                body: ErrorResponse::with_details(
                    "token_mismatch",
                    "Payment does not belong to this order",
                    serde_json::json!({ "commerceOrder": order }),
                ),
            },
            PipelineError::GatewayUnavailable(e) => {
                Self::new(StatusCode::BAD_GATEWAY, "gateway_unavailable", e.to_string())
            }
            PipelineError::Persistence(e) => Self::internal(e),
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::MissingToken => Self::bad_request("token_required", err.to_string()),
            NotificationError::InvalidSignature => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_signature", err.to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        if matches!(err, AccountError::Storage(_)) {
            return Self::internal(err);
        }
        let status = match &err {
            AccountError::MembershipInactive => StatusCode::FORBIDDEN,
            AccountError::PasswordRequired | AccountError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AccountError::Storage(_)
            | AccountError::InvalidToken
            | AccountError::AlreadyUsed
            | AccountError::TokenRequired
            | AccountError::PasswordTooShort { .. }
            | AccountError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.code(), err.to_string())
    }
}
