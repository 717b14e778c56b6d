//! HTTP adapter for membership lookup and account access.
//!
//! - `GET /api/membership?email=` - Current membership for an email
//! - `POST /api/auth/login` - Log in with email and optional password
//! - `POST /api/auth/set-password` - Redeem an activation token

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::account_routes;
