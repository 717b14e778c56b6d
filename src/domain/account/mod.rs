//! Customer accounts: activation tokens and password credentials.
//!
//! Accounts are decoupled from memberships. A membership can be active
//! before any password exists; once one is set, login requires it.

mod activation_token;
mod errors;
mod password;

pub use activation_token::{ActivationToken, TOKEN_BYTES};
pub use errors::AccountError;
pub use password::{Credentials, PasswordHash, HASH_BYTES, MIN_PASSWORD_LEN, PBKDF2_ITERATIONS, SALT_BYTES};
