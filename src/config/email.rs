//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
///
/// Without an API key activation links are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    #[serde(default)]
    pub resend_api_key: Option<String>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.resend_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.api_key() {
            if !key.starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_from_email() -> String {
    "onboarding@resend.dev".to_string()
}

fn default_from_name() -> String {
    "Factor Victoria".to_string()
}
