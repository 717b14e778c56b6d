//! In-memory adapters.
//!
//! Every store port has an implementation here backed by `tokio` locks.
//! They back the handler and integration tests and can run the service
//! without a database.

mod account_repositories;
mod intent_repository;
mod membership_repository;
mod payment_audit_repository;
mod recording_mailer;

pub use account_repositories::{InMemoryActivationTokenRepository, InMemoryCredentialRepository};
pub use intent_repository::InMemoryIntentRepository;
pub use membership_repository::InMemoryMembershipRepository;
pub use payment_audit_repository::InMemoryPaymentAuditRepository;
pub use recording_mailer::{RecordingMailer, SentActivation};
