//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Gateway
//!
//! - `PaymentGateway` - create-payment and get-status calls
//!
//! ## Stores
//!
//! - `IntentRepository` - Payment intents keyed by commerce order
//! - `MembershipRepository` - Memberships keyed by email
//! - `PaymentAuditRepository` - Gateway order audit trail
//! - `ActivationTokenRepository` - One-time activation tokens
//! - `CredentialRepository` - Password credentials
//!
//! ## Notifications
//!
//! - `ActivationMailer` - Activation link delivery

mod activation_mailer;
mod activation_token_repository;
mod credential_repository;
mod intent_repository;
mod membership_repository;
mod payment_audit_repository;
mod payment_gateway;

pub use activation_mailer::{ActivationMailer, MailDelivery, MailError};
pub use activation_token_repository::{ActivationTokenRepository, ConsumeOutcome};
pub use credential_repository::CredentialRepository;
pub use intent_repository::IntentRepository;
pub use membership_repository::MembershipRepository;
pub use payment_audit_repository::{PaymentAuditRepository, PaymentRecord};
pub use payment_gateway::{
    CreatePaymentRequest, CreatedPayment, PaymentError, PaymentErrorCode, PaymentGateway,
    PaymentStatusReport,
};
