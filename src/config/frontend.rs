//! Public URL configuration
//!
//! Links handed to the gateway and to customers are built from these.

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Public base URLs
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    /// Front-end base URL (return pages, activation links)
    pub public_url: String,

    /// Base URL at which the gateway reaches this service
    pub backend_url: String,
}

impl FrontendConfig {
    pub fn public_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    /// Validate URL configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        check_url(&self.public_url, "frontend public_url", environment)?;
        check_url(&self.backend_url, "frontend backend_url", environment)?;
        Ok(())
    }
}

fn check_url(url: &str, name: &'static str, environment: &Environment) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    if *environment == Environment::Production {
        if !url.starts_with("https://") {
            return Err(ValidationError::MustBeHttps(name));
        }
    } else if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ValidationError::InvalidUrl(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_url: &str, backend_url: &str) -> FrontendConfig {
        FrontendConfig {
            public_url: public_url.to_string(),
            backend_url: backend_url.to_string(),
        }
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let config = config("https://app.example/", "https://api.example//");
        assert_eq!(config.public_url(), "https://app.example");
        assert_eq!(config.backend_url(), "https://api.example");
    }

    #[test]
    fn test_http_allowed_outside_production() {
        let config = config("http://localhost:5173", "http://localhost:8080");
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(matches!(
            config.validate(&Environment::Production),
            Err(ValidationError::MustBeHttps(_))
        ));
    }

    #[test]
    fn test_missing_and_malformed_urls() {
        assert!(matches!(
            config("", "https://api.example").validate(&Environment::Development),
            Err(ValidationError::MissingRequired(_))
        ));
        assert!(matches!(
            config("app.example", "https://api.example").validate(&Environment::Development),
            Err(ValidationError::InvalidUrl(_))
        ));
    }
}
