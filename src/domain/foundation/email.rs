//! Normalized customer email address.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Customer email, trimmed and lower-cased.
///
/// Every store keys customers by this form, so two spellings of the same
/// address always land on the same membership row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ValidationError::invalid_format("email", "malformed address"));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format("email", "contains whitespace"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let email = EmailAddress::parse("  Ana@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(
            EmailAddress::parse("   "),
            Err(ValidationError::empty_field("email"))
        );
    }

    #[test]
    fn parse_rejects_missing_at() {
        assert!(EmailAddress::parse("not-an-email").is_err());
        assert!(EmailAddress::parse("@example.com").is_err());
        assert!(EmailAddress::parse("ana@").is_err());
        assert!(EmailAddress::parse("a@b@c").is_err());
    }

    #[test]
    fn deserializes_through_normalization() {
        let email: EmailAddress = serde_json::from_str("\"B@X.com\"").unwrap();
        assert_eq!(email.as_str(), "b@x.com");
        assert!(serde_json::from_str::<EmailAddress>("\"nope\"").is_err());
    }
}
