//! CreateCheckoutHandler - Opens a gateway payment for a plan.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use super::CheckoutError;
use crate::domain::checkout::{CommerceOrder, PaymentIntent};
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::domain::membership::{Plan, CURRENCY};
use crate::ports::{CreatePaymentRequest, IntentRepository, PaymentGateway};

/// Path the gateway posts notifications to, relative to the backend URL.
pub const CONFIRMATION_PATH: &str = "/api/pay/flow/confirm";

/// Front-end page the payer returns to when no return path is given.
pub const DEFAULT_RETURN_PATH: &str = "/login";

/// Deployment settings used to build checkout requests.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Public base URL of this service.
    pub backend_url: String,
    /// Public base URL of the front end.
    pub frontend_url: String,
    /// Charge `test_amount` instead of the plan price.
    pub test_mode: bool,
    pub test_amount: i64,
}

#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub plan_id: String,
    pub email: String,
    pub user_id: Option<String>,
    /// Front-end path to return to; must start with `/`.
    pub return_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutResult {
    pub plan_id: String,
    pub commerce_order: CommerceOrder,
    pub token: String,
    pub gateway_order_id: Option<String>,
    /// Where to send the payer.
    pub checkout_url: String,
    pub amount: i64,
    pub test_mode: bool,
}

/// Handler for checkout creation.
///
/// Nothing is stored unless the gateway accepts the payment.
pub struct CreateCheckoutHandler {
    gateway: Arc<dyn PaymentGateway>,
    intents: Arc<dyn IntentRepository>,
    settings: CheckoutSettings,
}

impl CreateCheckoutHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, intents: Arc<dyn IntentRepository>, settings: CheckoutSettings) -> Self {
        Self {
            gateway,
            intents,
            settings,
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutCommand) -> Result<CreateCheckoutResult, CheckoutError> {
        let plan = Plan::find(&cmd.plan_id).ok_or_else(|| CheckoutError::UnknownPlan(cmd.plan_id.clone()))?;
        let email = EmailAddress::parse(&cmd.email)?;
        let user_id = cmd.user_id.filter(|id| !id.trim().is_empty());

        let now = Timestamp::now();
        let commerce_order = CommerceOrder::encode(plan.id, &email, &now);
        let amount = if self.settings.test_mode {
            self.settings.test_amount
        } else {
            plan.amount
        };

        let request = CreatePaymentRequest {
            commerce_order: commerce_order.clone(),
            subject: format!("Membresía {}", plan.label),
            amount,
            currency: CURRENCY.to_string(),
            email: email.clone(),
            notify_url: format!("{}{}", base(&self.settings.backend_url), CONFIRMATION_PATH),
            return_url: self.return_url(cmd.return_path.as_deref(), &email, &commerce_order),
            optional: Some(
                json!({
                    "planId": plan.id,
                    "email": email.as_str(),
                    "userId": user_id,
                })
                .to_string(),
            ),
        };

        let created = self.gateway.create_payment(request).await.map_err(|e| {
            warn!(commerce_order = %commerce_order, error = %e, "Gateway refused checkout");
            e
        })?;

        let intent = PaymentIntent::new(commerce_order.clone(), plan.id, email, user_id, now)
            .with_gateway_session(created.token.clone(), created.gateway_order_id.clone());
        // The commerce order still carries plan and email if this write is lost.
        if let Err(e) = self.intents.save(&intent).await {
            warn!(commerce_order = %commerce_order, error = %e, "Could not persist payment intent");
        }

        info!(
            commerce_order = %commerce_order,
            plan_id = plan.id,
            amount,
            test_mode = self.settings.test_mode,
            "Checkout created"
        );

        Ok(CreateCheckoutResult {
            plan_id: plan.id.to_string(),
            checkout_url: created.checkout_url(),
            commerce_order,
            token: created.token,
            gateway_order_id: created.gateway_order_id,
            amount,
            test_mode: self.settings.test_mode,
        })
    }

    fn return_url(&self, return_path: Option<&str>, email: &EmailAddress, order: &CommerceOrder) -> String {
        let path = return_path
            .filter(|path| path.starts_with('/'))
            .unwrap_or(DEFAULT_RETURN_PATH);
        format!(
            "{}{}?email={}&paid=0&order={}",
            base(&self.settings.frontend_url),
            path,
            urlencoding::encode(email.as_str()),
            urlencoding::encode(order.as_str())
        )
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::flow::{GatewayCall, MockPaymentGateway};
    use crate::adapters::memory::InMemoryIntentRepository;
    use crate::domain::checkout::IntentStatus;
    use crate::ports::PaymentError;

    fn settings(test_mode: bool) -> CheckoutSettings {
        CheckoutSettings {
            backend_url: "https://api.example/".to_string(),
            frontend_url: "https://app.example".to_string(),
            test_mode,
            test_amount: 1000,
        }
    }

    fn command(plan_id: &str, email: &str) -> CreateCheckoutCommand {
        CreateCheckoutCommand {
            plan_id: plan_id.to_string(),
            email: email.to_string(),
            user_id: Some("u-1".to_string()),
            return_path: None,
        }
    }

    fn sent_request(gateway: &MockPaymentGateway) -> CreatePaymentRequest {
        match gateway.calls().into_iter().next() {
            Some(GatewayCall::CreatePayment(request)) => request,
            other => panic!("expected create call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn creates_payment_and_stores_intent() {
        let gateway = MockPaymentGateway::new();
        let intents = Arc::new(InMemoryIntentRepository::new());
        let handler = CreateCheckoutHandler::new(Arc::new(gateway.clone()), intents.clone(), settings(false));

        let result = handler.handle(command("monthly", " A@X.com ")).await.unwrap();

        assert_eq!(result.amount, 19_990);
        assert!(!result.test_mode);
        assert_eq!(result.token, "tok_1");
        assert_eq!(result.checkout_url, "https://sandbox.flow.test/app/web/pay.php?token=tok_1");
        assert!(result.commerce_order.as_str().starts_with("FV|monthly|a@x.com|"));

        let intent = intents
            .find_by_commerce_order(&result.commerce_order)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(intent.status, IntentStatus::Created);
        assert_eq!(intent.gateway_token.as_deref(), Some("tok_1"));
        assert_eq!(intent.user_id.as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn builds_gateway_request() {
        let gateway = MockPaymentGateway::new();
        let handler = CreateCheckoutHandler::new(
            Arc::new(gateway.clone()),
            Arc::new(InMemoryIntentRepository::new()),
            settings(false),
        );
        let mut cmd = command("anual", "a@x.com");
        cmd.return_path = Some("/cuenta".to_string());

        let result = handler.handle(cmd).await.unwrap();
        let request = sent_request(&gateway);

        assert_eq!(result.plan_id, "annual");
        assert_eq!(request.currency, "CLP");
        assert_eq!(request.amount, 99_990);
        assert_eq!(request.notify_url, "https://api.example/api/pay/flow/confirm");
        assert!(request
            .return_url
            .starts_with("https://app.example/cuenta?email=a%40x.com&paid=0&order=FV%7Cannual%7C"));
        let optional: serde_json::Value = serde_json::from_str(request.optional.as_deref().unwrap()).unwrap();
        assert_eq!(optional["planId"], "annual");
        assert_eq!(optional["userId"], "u-1");
    }

    #[tokio::test]
    async fn relative_return_path_falls_back_to_login() {
        let gateway = MockPaymentGateway::new();
        let handler = CreateCheckoutHandler::new(
            Arc::new(gateway.clone()),
            Arc::new(InMemoryIntentRepository::new()),
            settings(false),
        );
        let mut cmd = command("monthly", "a@x.com");
        cmd.return_path = Some("https://evil.example".to_string());

        handler.handle(cmd).await.unwrap();

        assert!(sent_request(&gateway).return_url.starts_with("https://app.example/login?"));
    }

    #[tokio::test]
    async fn test_mode_charges_test_amount() {
        let gateway = MockPaymentGateway::new();
        let handler = CreateCheckoutHandler::new(
            Arc::new(gateway.clone()),
            Arc::new(InMemoryIntentRepository::new()),
            settings(true),
        );

        let result = handler.handle(command("lifetime", "a@x.com")).await.unwrap();

        assert_eq!(result.amount, 1000);
        assert!(result.test_mode);
        assert_eq!(sent_request(&gateway).amount, 1000);
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected_before_gateway() {
        let gateway = MockPaymentGateway::new();
        let handler = CreateCheckoutHandler::new(
            Arc::new(gateway.clone()),
            Arc::new(InMemoryIntentRepository::new()),
            settings(false),
        );

        let err = handler.handle(command("weekly", "a@x.com")).await.unwrap_err();

        assert!(matches!(err, CheckoutError::UnknownPlan(plan) if plan == "weekly"));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let handler = CreateCheckoutHandler::new(
            Arc::new(MockPaymentGateway::new()),
            Arc::new(InMemoryIntentRepository::new()),
            settings(false),
        );

        let err = handler.handle(command("monthly", "")).await.unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn gateway_failure_persists_nothing() {
        let gateway = MockPaymentGateway::new();
        gateway.fail_create_payment(PaymentError::network("timeout"));
        let intents = Arc::new(InMemoryIntentRepository::new());
        let handler = CreateCheckoutHandler::new(Arc::new(gateway), intents.clone(), settings(false));

        let err = handler.handle(command("monthly", "a@x.com")).await.unwrap_err();

        assert!(matches!(err, CheckoutError::GatewayUnavailable(_)));
        assert!(intents.is_empty().await);
    }
}
