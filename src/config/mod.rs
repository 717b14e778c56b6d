//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEMBERSHIP_CHECKOUT` prefix and nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use membership_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod frontend;
mod gateway;
mod server;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use frontend::FrontendConfig;
pub use gateway::GatewayConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::adapters::email::ResendConfig;
use crate::application::CheckoutSettings;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment gateway configuration (Flow)
    pub gateway: GatewayConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Public URLs used in links
    pub frontend: FrontendConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEMBERSHIP_CHECKOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `MEMBERSHIP_CHECKOUT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MEMBERSHIP_CHECKOUT__GATEWAY__API_KEY=...` -> `gateway.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBERSHIP_CHECKOUT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.gateway.validate()?;
        self.email.validate()?;
        self.frontend.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Settings for building checkout requests.
    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            backend_url: self.frontend.backend_url().to_string(),
            frontend_url: self.frontend.public_url().to_string(),
            test_mode: self.gateway.test_mode,
            test_amount: self.gateway.test_amount,
        }
    }

    /// Settings for the activation mailer.
    pub fn resend_config(&self) -> ResendConfig {
        ResendConfig::new(self.email.api_key().map(str::to_string), self.email.from_header())
    }
}
