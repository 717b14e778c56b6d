//! HTTP adapter for checkout and payment endpoints.
//!
//! - `POST /api/pay/flow/create` - Open a gateway checkout
//! - `POST /api/pay/flow/confirm` - Gateway notification (push path)
//! - `GET /api/pay/flow/return` - Payer return (pull path)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::payment_routes;
