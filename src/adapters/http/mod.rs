//! HTTP adapters - REST API implementations.
//!
//! Each area has its own module with DTOs, handlers and routes.
//! `api_router` assembles them under `/api`.

pub mod account;
pub mod error;
pub mod payments;
pub mod state;

use axum::Router;

pub use account::account_routes;
pub use error::{ApiError, ErrorResponse};
pub use payments::payment_routes;
pub use state::AppState;

/// Complete API router with state applied.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new().merge(payment_routes()).merge(account_routes());

    Router::new().nest("/api", api).with_state(state)
}
