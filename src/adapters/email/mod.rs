//! Outbound email adapters.

mod resend_mailer;

pub use resend_mailer::{ResendConfig, ResendMailer, DEFAULT_RESEND_API_URL};
