//! Membership Checkout - Payment confirmation and membership activation.
//!
//! Opens Flow checkouts for membership plans, settles payments from both the
//! gateway notification and the payer's return, activates memberships
//! idempotently, and hands new customers a one-time activation link.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
