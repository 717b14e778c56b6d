//! Flow payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for the Flow API:
//! - `POST /payment/create` to open a payment session
//! - `POST /payment/getStatus` to query a payment by token
//!
//! # Security
//!
//! - Every request is signed with HMAC-SHA256 over the sorted parameters
//! - API key and secret are held as `secrecy::SecretString`

mod flow_adapter;
mod mock_gateway;
mod wire_types;

pub use flow_adapter::{FlowConfig, FlowGatewayAdapter, DEFAULT_FLOW_API_URL};
pub use mock_gateway::{GatewayCall, MockPaymentGateway};
pub use wire_types::{FlowCreateResponse, FlowStatusResponse};
