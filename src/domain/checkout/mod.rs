//! Checkout domain: commerce orders and payment intents.

mod commerce_order;
mod intent;

pub use commerce_order::{CommerceOrder, DecodedOrder, ORDER_TAG};
pub use intent::{IntentStatus, PaymentIntent};
