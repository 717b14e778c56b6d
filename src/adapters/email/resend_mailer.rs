//! Resend activation mailer.
//!
//! Sends the activation email through `POST /emails`. Without an API key
//! the mailer only logs the link and reports the delivery as skipped, so a
//! development setup still surfaces the link.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::EmailAddress;
use crate::ports::{ActivationMailer, MailDelivery, MailError};

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

const ACTIVATION_SUBJECT: &str = "Activa tu cuenta";

#[derive(Clone)]
pub struct ResendConfig {
    api_key: Option<SecretString>,
    from: String,
    api_base_url: String,
}

impl ResendConfig {
    /// `api_key` of `None` (or empty) turns sending off.
    pub fn new(api_key: Option<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()).map(SecretString::new),
            from: from.into(),
            api_base_url: DEFAULT_RESEND_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

pub struct ResendMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

fn activation_text(link: &str) -> String {
    format!(
        "Tu pago fue confirmado. Para crear tu contraseña y activar tu cuenta, abre: {}",
        link
    )
}

#[async_trait]
impl ActivationMailer for ResendMailer {
    async fn send_activation(&self, to: &EmailAddress, activation_link: &str) -> Result<MailDelivery, MailError> {
        let Some(api_key) = &self.config.api_key else {
            tracing::info!(
                to = %to,
                activation_link = activation_link,
                "Email provider not configured, activation link logged only"
            );
            return Ok(MailDelivery::Skipped);
        };

        let request = SendEmailRequest {
            from: &self.config.from,
            to: to.as_str(),
            subject: ACTIVATION_SUBJECT,
            text: activation_text(activation_link),
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.config.api_base_url.trim_end_matches('/')))
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let provider_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|body| body.id);
        Ok(MailDelivery::Sent { provider_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn spawn_fake(status: StatusCode) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
        let seen: Arc<Mutex<Vec<(Option<String>, Value)>>> = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let app = Router::new().route(
            "/emails",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    captured.lock().unwrap().push((auth, body));
                    (status, Json(json!({"id": "em_1"})))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn to() -> EmailAddress {
        EmailAddress::parse("a@x.com").unwrap()
    }

    #[tokio::test]
    async fn without_api_key_delivery_is_skipped() {
        let mailer = ResendMailer::new(ResendConfig::new(None, "No Reply <no-reply@x.com>"));
        let delivery = mailer.send_activation(&to(), "https://app/activar?token=t").await.unwrap();
        assert_eq!(delivery, MailDelivery::Skipped);
    }

    #[tokio::test]
    async fn blank_api_key_counts_as_missing() {
        assert!(!ResendConfig::new(Some("  ".to_string()), "x@x.com").is_enabled());
    }

    #[tokio::test]
    async fn sends_bearer_authenticated_json() {
        let (url, seen) = spawn_fake(StatusCode::OK).await;
        let config = ResendConfig::new(Some("re_key".to_string()), "No Reply <no-reply@x.com>").with_base_url(url);

        let delivery = ResendMailer::new(config)
            .send_activation(&to(), "https://app/activar?token=t")
            .await
            .unwrap();

        assert_eq!(delivery, MailDelivery::Sent { provider_id: Some("em_1".to_string()) });
        let (auth, body) = seen.lock().unwrap()[0].clone();
        assert_eq!(auth.as_deref(), Some("Bearer re_key"));
        assert_eq!(body["to"], "a@x.com");
        assert!(body["text"].as_str().unwrap().contains("https://app/activar?token=t"));
    }

    #[tokio::test]
    async fn provider_rejection_is_an_error() {
        let (url, _seen) = spawn_fake(StatusCode::UNPROCESSABLE_ENTITY).await;
        let config = ResendConfig::new(Some("re_key".to_string()), "x@x.com").with_base_url(url);

        let err = ResendMailer::new(config)
            .send_activation(&to(), "https://app/activar?token=t")
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Rejected { status: 422, .. }));
    }
}
