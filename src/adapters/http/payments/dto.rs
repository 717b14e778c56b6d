//! HTTP DTOs for the checkout and payment endpoints.
//!
//! Field names follow the front end's camelCase contract.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{CreateCheckoutResult, ReconcileReturnResult};
use crate::domain::membership::MembershipTier;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/pay/flow/create`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub return_path: Option<String>,
}

/// Query of `GET /api/pay/flow/return`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnQuery {
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub ok: bool,
    pub plan_id: String,
    pub commerce_order: String,
    pub flow_order: Option<String>,
    pub token: String,
    /// Gateway checkout page for the payer.
    pub url: String,
    pub amount: i64,
    pub test_mode: bool,
}

impl From<CreateCheckoutResult> for CheckoutResponse {
    fn from(result: CreateCheckoutResult) -> Self {
        Self {
            ok: true,
            plan_id: result.plan_id,
            commerce_order: result.commerce_order.as_str().to_string(),
            flow_order: result.gateway_order_id,
            token: result.token,
            url: result.checkout_url,
            amount: result.amount,
            test_mode: result.test_mode,
        }
    }
}

/// Answer of the return endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReturnResponse {
    #[serde(rename_all = "camelCase")]
    Paid {
        ok: bool,
        paid: bool,
        plan_id: String,
        tier: MembershipTier,
        email: String,
        commerce_order: String,
        flow_order: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Pending {
        ok: bool,
        paid: bool,
        status: String,
        commerce_order: String,
    },
}

impl From<ReconcileReturnResult> for ReturnResponse {
    fn from(result: ReconcileReturnResult) -> Self {
        match result {
            ReconcileReturnResult::Paid {
                membership,
                commerce_order,
                gateway_order_id,
            } => ReturnResponse::Paid {
                ok: true,
                paid: true,
                plan_id: membership.plan_id,
                tier: membership.tier,
                email: membership.email.as_str().to_string(),
                commerce_order: commerce_order.as_str().to_string(),
                flow_order: gateway_order_id,
            },
            ReconcileReturnResult::Pending { status, commerce_order } => ReturnResponse::Pending {
                ok: true,
                paid: false,
                status,
                commerce_order: commerce_order.as_str().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::CommerceOrder;

    #[test]
    fn create_request_accepts_partial_bodies() {
        let request: CreateCheckoutRequest = serde_json::from_str(r#"{"planId":"monthly"}"#).unwrap();
        assert_eq!(request.plan_id.as_deref(), Some("monthly"));
        assert!(request.email.is_none());
    }

    #[test]
    fn pending_response_uses_camel_case() {
        let response = ReturnResponse::from(ReconcileReturnResult::Pending {
            status: "pending".to_string(),
            commerce_order: CommerceOrder::parse("FV|monthly|a@x.com|1").unwrap(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["paid"], false);
        assert_eq!(json["commerceOrder"], "FV|monthly|a@x.com|1");
    }
}
