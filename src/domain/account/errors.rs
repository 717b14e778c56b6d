//! Account error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};

/// Errors from activation tokens, password setup and login.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Token unknown to the store.
    #[error("Invalid activation token")]
    InvalidToken,

    /// Token was consumed before.
    #[error("Activation token already used")]
    AlreadyUsed,

    #[error("Activation token is required")]
    TokenRequired,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Membership is not active")]
    MembershipInactive,

    /// The customer has set a password and must supply it.
    #[error("Password required")]
    PasswordRequired,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] DomainError),
}

impl AccountError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::InvalidToken => "invalid_token",
            AccountError::AlreadyUsed => "already_used",
            AccountError::TokenRequired => "token_required",
            AccountError::PasswordTooShort { .. } => "password_too_short",
            AccountError::MembershipInactive => "membership_inactive",
            AccountError::PasswordRequired => "password_required",
            AccountError::InvalidPassword => "invalid_password",
            AccountError::InvalidEmail(_) => "invalid_email",
            AccountError::Storage(_) => "internal_error",
        }
    }
}
