//! Foundation module - Shared domain primitives.
//!
//! Contains value objects and error types that form the vocabulary of the
//! checkout and membership domain.

mod email;
mod errors;
mod state_machine;
mod timestamp;

pub use email::EmailAddress;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
