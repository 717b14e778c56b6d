//! Account handlers.
//!
//! ## Commands
//! - Provisioning account access after a first activation
//! - Setting a password with an activation token
//! - Logging in

mod login;
mod provision_account;
mod set_password;

pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use provision_account::{
    EmailOutcome, ProvisionAccountCommand, ProvisionAccountHandler, ProvisionAccountResult, ACTIVATION_PATH,
};
pub use set_password::{SetPasswordCommand, SetPasswordHandler, SetPasswordResult};
