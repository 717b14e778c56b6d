//! Payment gateway configuration (Flow)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::flow::{FlowConfig, DEFAULT_FLOW_API_URL};
use crate::domain::gateway::SignatureEngine;

/// Gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Merchant API key, sent as `apiKey`
    pub api_key: String,

    /// Shared secret used to sign requests
    pub secret_key: SecretString,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Charge `test_amount` instead of plan prices
    #[serde(default)]
    pub test_mode: bool,

    /// Amount charged in test mode
    #[serde(default = "default_test_amount")]
    pub test_amount: i64,

    /// Check `s` on inbound notifications that carry one
    #[serde(default)]
    pub verify_inbound_signatures: bool,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Adapter settings for the Flow client.
    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig::new(self.api_key.clone(), self.secret_key.expose_secret().clone())
            .with_base_url(self.api_url.clone())
            .with_timeout(self.timeout())
    }

    /// Engine for inbound notifications, when verification is enabled.
    pub fn inbound_verifier(&self) -> Option<SignatureEngine> {
        self.verify_inbound_signatures
            .then(|| SignatureEngine::new(self.secret_key.clone()))
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_API_KEY"));
        }
        if self.secret_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_SECRET_KEY"));
        }
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("gateway api_url"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 9 {
            return Err(ValidationError::InvalidGatewayTimeout);
        }
        if self.test_mode && self.test_amount <= 0 {
            return Err(ValidationError::InvalidTestAmount);
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    DEFAULT_FLOW_API_URL.to_string()
}

fn default_timeout() -> u64 {
    8
}

fn default_test_amount() -> i64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig {
            api_url: default_api_url(),
            api_key: "api-key".to_string(),
            secret_key: SecretString::new("secret".to_string()),
            timeout_secs: default_timeout(),
            test_mode: false,
            test_amount: default_test_amount(),
            verify_inbound_signatures: false,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().timeout(), Duration::from_secs(8));
    }

    #[test]
    fn test_missing_credentials() {
        let mut missing_key = config();
        missing_key.api_key = String::new();
        assert!(matches!(
            missing_key.validate(),
            Err(ValidationError::MissingRequired("GATEWAY_API_KEY"))
        ));

        let mut missing_secret = config();
        missing_secret.secret_key = SecretString::new(" ".to_string());
        assert!(matches!(
            missing_secret.validate(),
            Err(ValidationError::MissingRequired("GATEWAY_SECRET_KEY"))
        ));
    }

    #[test]
    fn test_timeout_must_stay_single_digit() {
        let mut slow = config();
        slow.timeout_secs = 15;
        assert!(matches!(slow.validate(), Err(ValidationError::InvalidGatewayTimeout)));

        let mut zero = config();
        zero.timeout_secs = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_test_mode_needs_positive_amount() {
        let mut test_mode = config();
        test_mode.test_mode = true;
        test_mode.test_amount = 0;
        assert!(matches!(test_mode.validate(), Err(ValidationError::InvalidTestAmount)));
    }

    #[test]
    fn test_inbound_verifier_follows_flag() {
        assert!(config().inbound_verifier().is_none());

        let mut verifying = config();
        verifying.verify_inbound_signatures = true;
        assert!(verifying.inbound_verifier().is_some());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("\"secret\""));
    }
}
