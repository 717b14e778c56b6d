//! HTTP handlers for checkout and payment endpoints.

use std::collections::{BTreeMap, HashMap};

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::debug;

use super::dto::{CheckoutResponse, CreateCheckoutRequest, ReturnQuery, ReturnResponse};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{ConfirmPaymentCommand, CreateCheckoutCommand, ReconcileReturnCommand};
use crate::domain::checkout::CommerceOrder;

/// POST /api/pay/flow/create - Open a gateway checkout for a plan
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_checkout_handler();
    let cmd = CreateCheckoutCommand {
        plan_id: request.plan_id.unwrap_or_default(),
        email: request.email.unwrap_or_default(),
        user_id: request.user_id,
        return_path: request.return_path,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CheckoutResponse::from(result)))
}

/// POST /api/pay/flow/confirm - Gateway notification (push path)
///
/// Answers as soon as the token is extracted; settlement runs in the
/// background so the gateway's response deadline is always met.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let params = notification_params(content_type, &body, query);

    let handler = state.confirm_payment_handler();
    let accepted = handler.accept(&ConfirmPaymentCommand { params })?;
    debug!(token = %accepted.token, "Notification accepted");

    tokio::spawn(async move {
        // Outcome is logged by the handler.
        let _ = handler.handle(accepted).await;
    });

    Ok((StatusCode::OK, "OK"))
}

/// GET /api/pay/flow/return - Payer returns from the gateway (pull path)
pub async fn payment_return(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let order = query
        .order
        .as_deref()
        .and_then(|order| CommerceOrder::parse(order).ok())
        .ok_or_else(|| ApiError::bad_request("order_required", "Query parameter 'order' is required"))?;

    let handler = state.reconcile_return_handler();
    let result = handler
        .handle(ReconcileReturnCommand {
            commerce_order: order,
            token: query.token,
        })
        .await?;

    Ok(Json(ReturnResponse::from(result)))
}

/// Collects notification parameters from the body and query string.
///
/// The body may be form-encoded or JSON; body values win over the query.
pub fn notification_params(
    content_type: Option<&str>,
    body: &[u8],
    query: HashMap<String, String>,
) -> BTreeMap<String, String> {
    let mut params: BTreeMap<String, String> = query.into_iter().collect();

    let is_json = content_type.is_some_and(|ct| ct.contains("json"))
        || body.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{');

    let from_body = if is_json {
        json_params(body)
    } else {
        form_params(body)
    };
    params.extend(from_body);
    params
}

fn json_params(body: &[u8]) -> BTreeMap<String, String> {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) else {
        return BTreeMap::new();
    };
    map.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Number(n) => Some((key, n.to_string())),
            serde_json::Value::Bool(b) => Some((key, b.to_string())),
            _ => None,
        })
        .collect()
}

fn form_params(body: &[u8]) -> BTreeMap<String, String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}
