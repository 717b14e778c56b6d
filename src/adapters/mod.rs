//! Adapters - Implementations of port interfaces.
//!
//! - `flow` - Flow payment gateway client and a scripted mock
//! - `email` - Resend activation mailer
//! - `postgres` - PostgreSQL repositories
//! - `memory` - In-memory repositories for tests and local runs
//! - `http` - Axum REST API

pub mod email;
pub mod flow;
pub mod http;
pub mod memory;
pub mod postgres;

pub use email::{ResendConfig, ResendMailer};
pub use flow::{FlowConfig, FlowGatewayAdapter, MockPaymentGateway};
pub use http::{api_router, AppState};
