//! Payment gateway vocabulary: request signatures and status codes.

mod payment_status;
mod signature;

pub use payment_status::GatewayPaymentStatus;
pub use signature::{SignatureEngine, SignatureError, SIGNATURE_PARAM};
