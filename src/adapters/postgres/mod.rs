//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Every repository holds a clone of the `PgPool` created at startup.
//! Writes are single-statement upserts or conditional updates keyed by the
//! unique columns in `migrations/`, which is what keeps the push and pull
//! settlement paths from producing inconsistent rows.

mod activation_token_repository;
mod credential_repository;
mod intent_repository;
mod membership_repository;
mod payment_audit_repository;

pub use activation_token_repository::PostgresActivationTokenRepository;
pub use credential_repository::PostgresCredentialRepository;
pub use intent_repository::PostgresIntentRepository;
pub use membership_repository::PostgresMembershipRepository;
pub use payment_audit_repository::PostgresPaymentAuditRepository;
