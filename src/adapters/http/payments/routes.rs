//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{confirm_payment, create_checkout, payment_return};
use crate::adapters::http::state::AppState;

/// Create the payment router, mounted under `/api`.
///
/// # Routes
/// - `POST /pay/flow/create` - Open a checkout
/// - `POST /pay/flow/confirm` - Gateway notification, signature optional
/// - `GET /pay/flow/return` - Reconcile on payer return
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/pay/flow/create", post(create_checkout))
        .route("/pay/flow/confirm", post(confirm_payment))
        .route("/pay/flow/return", get(payment_return))
}
