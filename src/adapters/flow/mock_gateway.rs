//! Scripted payment gateway for tests.
//!
//! Status reports are configured per token; errors can be injected for
//! either call; every call is recorded for assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::checkout::CommerceOrder;
use crate::domain::gateway::GatewayPaymentStatus;
use crate::ports::{CreatePaymentRequest, CreatedPayment, PaymentError, PaymentGateway, PaymentStatusReport};

/// Recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreatePayment(CreatePaymentRequest),
    GetStatus(String),
}

#[derive(Default)]
struct MockState {
    statuses: HashMap<String, PaymentStatusReport>,
    create_error: Option<PaymentError>,
    status_error: Option<PaymentError>,
    created_count: u64,
    calls: Vec<GatewayCall>,
}

#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds a report the way the real gateway would.
    pub fn report(
        status_code: i64,
        commerce_order: Option<&CommerceOrder>,
        gateway_order_id: &str,
        payer_email: Option<&str>,
    ) -> PaymentStatusReport {
        let raw = json!({
            "status": status_code,
            "commerceOrder": commerce_order.map(CommerceOrder::as_str),
            "flowOrder": gateway_order_id,
            "payer": payer_email,
        });
        PaymentStatusReport {
            status: GatewayPaymentStatus::from_raw(&json!(status_code)),
            commerce_order: commerce_order.cloned(),
            gateway_order_id: Some(gateway_order_id.to_string()),
            payer_email: payer_email.map(str::to_string),
            raw,
        }
    }

    /// Answers `get_status(token)` with `report` from now on.
    pub fn set_status(&self, token: impl Into<String>, report: PaymentStatusReport) {
        self.state().statuses.insert(token.into(), report);
    }

    pub fn fail_create_payment(&self, error: PaymentError) {
        self.state().create_error = Some(error);
    }

    pub fn fail_get_status(&self, error: PaymentError) {
        self.state().status_error = Some(error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.create_error = None;
        state.status_error = None;
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    pub fn status_calls(&self, token: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::GetStatus(t) if t == token))
            .count()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment(&self, request: CreatePaymentRequest) -> Result<CreatedPayment, PaymentError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::CreatePayment(request));
        if let Some(err) = state.create_error.clone() {
            return Err(err);
        }

        state.created_count += 1;
        let n = state.created_count;
        Ok(CreatedPayment {
            token: format!("tok_{}", n),
            redirect_url: "https://sandbox.flow.test/app/web/pay.php".to_string(),
            gateway_order_id: Some((1000 + n).to_string()),
        })
    }

    async fn get_status(&self, token: &str) -> Result<PaymentStatusReport, PaymentError> {
        let mut state = self.state();
        state.calls.push(GatewayCall::GetStatus(token.to_string()));
        if let Some(err) = state.status_error.clone() {
            return Err(err);
        }

        state
            .statuses
            .get(token)
            .cloned()
            .ok_or_else(|| PaymentError::http_status(400, format!("unknown token {}", token)))
    }
}
