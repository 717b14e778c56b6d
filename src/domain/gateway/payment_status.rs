//! Payment status codes reported by the gateway.

use serde_json::Value;

use crate::domain::checkout::IntentStatus;

/// Status of a payment as reported by `getStatus`.
///
/// Exactly one value, `Paid` (code `2`), proves payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayPaymentStatus {
    Pending,
    Paid,
    Rejected,
    Canceled,
    /// Code the gateway sent that this service does not recognise.
    Unknown(String),
}

impl GatewayPaymentStatus {
    /// Reads the `status` field, which arrives either as a number or a string.
    pub fn from_raw(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(code) => Self::from_code(code),
                None => Self::Unknown(n.to_string()),
            },
            Value::String(s) => Self::from_text(s),
            Value::Null => Self::Unknown(String::new()),
            other => Self::Unknown(other.to_string()),
        }
    }

    fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Pending,
            2 => Self::Paid,
            3 => Self::Rejected,
            4 => Self::Canceled,
            other => Self::Unknown(other.to_string()),
        }
    }

    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "paid" => Self::Paid,
            "rejected" => Self::Rejected,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Short label used in logs, audit rows and API responses.
    pub fn label(&self) -> String {
        match self {
            Self::Pending => "pending".to_string(),
            Self::Paid => "paid".to_string(),
            Self::Rejected => "rejected".to_string(),
            Self::Canceled => "canceled".to_string(),
            Self::Unknown(code) => format!("unknown:{}", code),
        }
    }

    /// Intent status this report moves the intent to.
    ///
    /// Unrecognised codes are treated as still pending.
    pub fn intent_status(&self) -> IntentStatus {
        match self {
            Self::Paid => IntentStatus::Paid,
            Self::Rejected | Self::Canceled => IntentStatus::Failed,
            Self::Pending | Self::Unknown(_) => IntentStatus::Pending,
        }
    }
}
