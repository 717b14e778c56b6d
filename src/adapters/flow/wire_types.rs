//! Flow API response bodies.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /payment/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowCreateResponse {
    pub token: String,
    pub url: String,
    #[serde(rename = "flowOrder", default)]
    pub flow_order: Option<Value>,
}

/// Body of `POST /payment/getStatus`. Only the fields the pipeline reads.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowStatusResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(rename = "commerceOrder", default)]
    pub commerce_order: Option<String>,
    #[serde(rename = "flowOrder", default)]
    pub flow_order: Option<Value>,
    #[serde(default)]
    pub payer: Option<String>,
}

/// Flow sends order numbers as integers but older responses used strings.
pub fn flow_order_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flow_order_accepts_number_and_string() {
        assert_eq!(flow_order_id(Some(&json!(4411))), Some("4411".to_string()));
        assert_eq!(flow_order_id(Some(&json!(" 4411 "))), Some("4411".to_string()));
        assert_eq!(flow_order_id(Some(&json!(""))), None);
        assert_eq!(flow_order_id(Some(&json!(null))), None);
        assert_eq!(flow_order_id(None), None);
    }

    #[test]
    fn status_response_tolerates_missing_fields() {
        let parsed: FlowStatusResponse = serde_json::from_value(json!({"status": 2})).unwrap();
        assert_eq!(parsed.status, json!(2));
        assert!(parsed.commerce_order.is_none());
        assert!(parsed.payer.is_none());
    }
}
