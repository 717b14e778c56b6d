//! Commerce order identifiers.
//!
//! A commerce order names one checkout attempt and carries enough of the
//! checkout inside it (plan and customer email) to activate a membership
//! even when the stored intent cannot be found:
//!
//! ```text
//! FV|<plan_id>|<email>|<unix_millis>
//! ```
//!
//! Decoding is best effort. A value that carries the tag always decodes,
//! with any part that cannot be read left as `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{EmailAddress, Timestamp, ValidationError};

/// Namespace tag that opens every order this service issues.
pub const ORDER_TAG: &str = "FV";

const DELIMITER: char = '|';

/// Older checkouts used `FV-<plan>-<user>-<millis>-<nonce>`.
const LEGACY_DELIMITER: char = '-';

/// Merchant-side identifier of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommerceOrder(String);

/// What could be recovered from a commerce order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedOrder {
    pub plan_id: Option<String>,
    pub email: Option<EmailAddress>,
    pub issued_at: Option<Timestamp>,
}

impl CommerceOrder {
    /// Builds the order for a new checkout.
    pub fn encode(plan_id: &str, email: &EmailAddress, issued_at: &Timestamp) -> Self {
        Self(format!(
            "{tag}{d}{plan}{d}{email}{d}{millis}",
            tag = ORDER_TAG,
            d = DELIMITER,
            plan = plan_id,
            email = email,
            millis = issued_at.as_unix_millis(),
        ))
    }

    /// Wraps an order received from outside (gateway payload, query string).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("commerce_order"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers plan, email and issue time.
    ///
    /// Returns `None` only when the value was not issued by this service.
    pub fn decode(&self) -> Option<DecodedOrder> {
        if let Some(rest) = self.0.strip_prefix(ORDER_TAG) {
            if let Some(body) = rest.strip_prefix(DELIMITER) {
                return Some(decode_body(body));
            }
            if let Some(body) = rest.strip_prefix(LEGACY_DELIMITER) {
                return Some(decode_legacy_body(body));
            }
        }
        None
    }
}

fn decode_body(body: &str) -> DecodedOrder {
    let (plan, remainder) = match body.split_once(DELIMITER) {
        Some((plan, remainder)) => (plan, Some(remainder)),
        None => (body, None),
    };

    // The email sits between the first and last delimiters so that an
    // address containing the delimiter still decodes.
    let (email, issued_at) = match remainder {
        Some(remainder) => match remainder.rsplit_once(DELIMITER) {
            Some((email, millis)) => match millis.parse::<i64>() {
                Ok(millis) => (email, Timestamp::from_unix_millis(millis)),
                Err(_) => (remainder, None),
            },
            None => (remainder, None),
        },
        None => ("", None),
    };

    DecodedOrder {
        plan_id: non_empty(plan),
        email: EmailAddress::parse(email).ok(),
        issued_at,
    }
}

fn decode_legacy_body(body: &str) -> DecodedOrder {
    DecodedOrder {
        plan_id: body.split(LEGACY_DELIMITER).next().and_then(non_empty),
        ..DecodedOrder::default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl fmt::Display for CommerceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
