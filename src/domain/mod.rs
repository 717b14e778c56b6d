//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (email, timestamp, errors, state machine)
//! - `checkout` - Commerce orders and payment intents
//! - `gateway` - Gateway signature scheme and payment status codes
//! - `membership` - Plan catalog, tiers and the membership record
//! - `account` - Activation tokens and password credentials

pub mod account;
pub mod checkout;
pub mod foundation;
pub mod gateway;
pub mod membership;
