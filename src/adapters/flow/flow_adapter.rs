//! Flow payment gateway adapter.
//!
//! Implements `PaymentGateway` against the Flow REST API. Every call is a
//! form-encoded POST carrying `apiKey` and the request signature `s`.
//!
//! # Timeouts and retries
//!
//! Each attempt is bounded by the configured timeout (single-digit seconds)
//! so a hung gateway cannot stall the caller. Network failures and 5xx
//! responses are retried once; anything else is returned immediately.
//!
//! ```ignore
//! let config = FlowConfig::new(api_key, secret_key).with_base_url("https://sandbox.flow.cl/api");
//! let adapter = FlowGatewayAdapter::new(config)?;
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::checkout::CommerceOrder;
use crate::domain::gateway::{GatewayPaymentStatus, SignatureEngine};
use crate::ports::{CreatePaymentRequest, CreatedPayment, PaymentError, PaymentGateway, PaymentStatusReport};

use super::wire_types::{flow_order_id, FlowCreateResponse, FlowStatusResponse};

/// Production API root.
pub const DEFAULT_FLOW_API_URL: &str = "https://www.flow.cl/api";

/// Attempts per call: the first try plus one retry.
const MAX_ATTEMPTS: u32 = 2;

/// Flow API configuration.
#[derive(Clone)]
pub struct FlowConfig {
    api_key: SecretString,
    secret_key: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl FlowConfig {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: DEFAULT_FLOW_API_URL.to_string(),
            timeout: Duration::from_secs(8),
        }
    }

    /// Set a custom API base URL (sandbox or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Signature engine keyed with this account's secret.
    pub fn signature_engine(&self) -> SignatureEngine {
        SignatureEngine::new(self.secret_key.clone())
    }
}

/// Flow gateway adapter.
pub struct FlowGatewayAdapter {
    config: FlowConfig,
    signer: SignatureEngine,
    http_client: reqwest::Client,
}

impl FlowGatewayAdapter {
    pub fn new(config: FlowConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::configuration(e.to_string()))?;

        Ok(Self {
            signer: config.signature_engine(),
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    /// Signs `params` and posts them, retrying once on transient failure.
    async fn post_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: BTreeMap<String, String>,
    ) -> Result<T, PaymentError> {
        params.insert("apiKey".to_string(), self.config.api_key.expose_secret().clone());
        let form = self
            .signer
            .signed_params(params)
            .map_err(|e| PaymentError::configuration(e.to_string()))?;
        let url = self.endpoint(path);

        let mut attempt = 1;
        loop {
            match self.post_once(&url, &form).await {
                Ok(body) => return Ok(body),
                Err(err) if err.retryable && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(
                        path = path,
                        attempt = attempt,
                        error = %err,
                        "Flow request failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn post_once<T: DeserializeOwned>(&self, url: &str, form: &[(String, String)]) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::http_status(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PaymentError::invalid_response(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for FlowGatewayAdapter {
    async fn create_payment(&self, request: CreatePaymentRequest) -> Result<CreatedPayment, PaymentError> {
        let mut params = BTreeMap::new();
        params.insert("commerceOrder".to_string(), request.commerce_order.as_str().to_string());
        params.insert("subject".to_string(), request.subject);
        params.insert("currency".to_string(), request.currency);
        params.insert("amount".to_string(), request.amount.to_string());
        params.insert("email".to_string(), request.email.as_str().to_string());
        params.insert("urlConfirmation".to_string(), request.notify_url);
        params.insert("urlReturn".to_string(), request.return_url);
        if let Some(optional) = request.optional {
            params.insert("optional".to_string(), optional);
        }

        let response: FlowCreateResponse = self.post_signed("/payment/create", params).await?;
        if response.token.is_empty() || response.url.is_empty() {
            return Err(PaymentError::invalid_response("payment/create returned no token or url"));
        }

        Ok(CreatedPayment {
            gateway_order_id: flow_order_id(response.flow_order.as_ref()),
            token: response.token,
            redirect_url: response.url,
        })
    }

    async fn get_status(&self, token: &str) -> Result<PaymentStatusReport, PaymentError> {
        let mut params = BTreeMap::new();
        params.insert("token".to_string(), token.to_string());

        let raw: serde_json::Value = self.post_signed("/payment/getStatus", params).await?;
        let parsed: FlowStatusResponse =
            serde_json::from_value(raw.clone()).map_err(|e| PaymentError::invalid_response(e.to_string()))?;

        Ok(PaymentStatusReport {
            status: GatewayPaymentStatus::from_raw(&parsed.status),
            commerce_order: parsed
                .commerce_order
                .as_deref()
                .and_then(|order| CommerceOrder::parse(order).ok()),
            gateway_order_id: flow_order_id(parsed.flow_order.as_ref()),
            payer_email: parsed.payer.filter(|payer| !payer.trim().is_empty()),
            raw,
        })
    }
}
