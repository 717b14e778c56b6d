//! ReconcileReturnHandler - Pull path: the payer's browser comes back.
//!
//! Runs the same settlement as the push path, so a dropped or delayed
//! notification is recovered the moment the payer lands on the return page.

use std::sync::Arc;

use tracing::{error, warn};

use super::{PipelineError, SettlePaymentCommand, SettlePaymentHandler, SettlePaymentResult, SettlementSource};
use crate::domain::checkout::CommerceOrder;
use crate::domain::membership::Membership;
use crate::ports::IntentRepository;

#[derive(Debug, Clone)]
pub struct ReconcileReturnCommand {
    pub commerce_order: CommerceOrder,
    /// Token from the return URL, when the gateway included it.
    pub token: Option<String>,
}

/// What the payer should be shown.
#[derive(Debug, Clone)]
pub enum ReconcileReturnResult {
    Paid {
        membership: Membership,
        commerce_order: CommerceOrder,
        gateway_order_id: Option<String>,
    },
    /// Not paid yet, or the outcome could not be determined right now.
    Pending {
        status: String,
        commerce_order: CommerceOrder,
    },
}

pub struct ReconcileReturnHandler {
    intents: Arc<dyn IntentRepository>,
    settlement: Arc<SettlePaymentHandler>,
}

impl ReconcileReturnHandler {
    pub fn new(intents: Arc<dyn IntentRepository>, settlement: Arc<SettlePaymentHandler>) -> Self {
        Self { intents, settlement }
    }

    /// # Errors
    ///
    /// - `IntentNotFound` when no token is supplied and none is stored
    /// - `TokenMismatch` when the supplied token is not the order's own
    /// - `OrderMismatch` when the gateway reports the token paid another order
    /// - `DataIncomplete` when paid but plan or email cannot be resolved
    ///
    /// Gateway and persistence failures render as `Pending`.
    pub async fn handle(&self, cmd: ReconcileReturnCommand) -> Result<ReconcileReturnResult, PipelineError> {
        let order = cmd.commerce_order;

        let token = self.resolve_token(&order, cmd.token).await?;

        let settled = self
            .settlement
            .handle(SettlePaymentCommand {
                token,
                commerce_order: Some(order.clone()),
                source: SettlementSource::Return,
            })
            .await;

        match settled {
            Ok(SettlePaymentResult::Activated {
                membership,
                gateway_order_id,
                ..
            }) => Ok(ReconcileReturnResult::Paid {
                membership,
                commerce_order: order,
                gateway_order_id,
            }),
            Ok(SettlePaymentResult::NotPaid { status, .. }) => Ok(ReconcileReturnResult::Pending {
                status: status.intent_status().to_string(),
                commerce_order: order,
            }),
            Err(PipelineError::GatewayUnavailable(e)) => {
                warn!(commerce_order = %order, error = %e, "Gateway unavailable on return, showing pending");
                Ok(pending(order))
            }
            Err(PipelineError::Persistence(e)) => {
                error!(commerce_order = %order, error = %e, "Activation failed on return, showing pending");
                Ok(pending(order))
            }
            Err(other) => Err(other),
        }
    }

    /// Prefers the token stored with the intent. A token from the query is
    /// only used when none is stored, and must match it otherwise.
    async fn resolve_token(&self, order: &CommerceOrder, supplied: Option<String>) -> Result<String, PipelineError> {
        let supplied = supplied.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        let intent = self.intents.find_by_commerce_order(order).await.unwrap_or_else(|e| {
            warn!(commerce_order = %order, error = %e, "Intent lookup failed on return");
            None
        });
        let stored = intent.and_then(|intent| intent.gateway_token);

        match (stored, supplied) {
            (Some(stored), Some(supplied)) if stored != supplied => {
                warn!(commerce_order = %order, "Return token does not match the order's checkout");
                Err(PipelineError::TokenMismatch(order.to_string()))
            }
            (Some(stored), _) => Ok(stored),
            (None, Some(supplied)) => Ok(supplied),
            (None, None) => Err(PipelineError::IntentNotFound(order.to_string())),
        }
    }
}

fn pending(commerce_order: CommerceOrder) -> ReconcileReturnResult {
    ReconcileReturnResult::Pending {
        status: "pending".to_string(),
        commerce_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::flow::MockPaymentGateway;
    use crate::adapters::memory::{
        InMemoryActivationTokenRepository, InMemoryIntentRepository, InMemoryMembershipRepository,
        InMemoryPaymentAuditRepository, RecordingMailer,
    };
    use crate::application::handlers::account::ProvisionAccountHandler;
    use crate::application::handlers::membership::ActivateMembershipHandler;
    use crate::domain::checkout::{IntentStatus, PaymentIntent};
    use crate::domain::foundation::{EmailAddress, Timestamp};
    use crate::ports::PaymentError;

    struct Fixture {
        gateway: MockPaymentGateway,
        intents: Arc<InMemoryIntentRepository>,
        memberships: Arc<InMemoryMembershipRepository>,
        handler: ReconcileReturnHandler,
    }

    fn fixture() -> Fixture {
        let gateway = MockPaymentGateway::new();
        let intents = Arc::new(InMemoryIntentRepository::new());
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let audit = Arc::new(InMemoryPaymentAuditRepository::new());
        let settlement = Arc::new(SettlePaymentHandler::new(
            Arc::new(gateway.clone()),
            intents.clone(),
            audit.clone(),
            Arc::new(ActivateMembershipHandler::new(memberships.clone(), intents.clone(), audit)),
            Arc::new(ProvisionAccountHandler::new(
                Arc::new(InMemoryActivationTokenRepository::new()),
                Arc::new(RecordingMailer::new()),
                "https://app.example",
            )),
        ));
        let handler = ReconcileReturnHandler::new(intents.clone(), settlement);
        Fixture {
            gateway,
            intents,
            memberships,
            handler,
        }
    }

    async fn saved_intent(f: &Fixture, token: Option<&str>) -> CommerceOrder {
        saved_plan_intent(f, "annual", token, "42").await
    }

    async fn saved_plan_intent(f: &Fixture, plan_id: &str, token: Option<&str>, gateway_order_id: &str) -> CommerceOrder {
        let email = EmailAddress::parse("a@x.com").unwrap();
        let now = Timestamp::now();
        let order = CommerceOrder::encode(plan_id, &email, &now);
        let mut intent = PaymentIntent::new(order.clone(), plan_id, email, None, now);
        if let Some(token) = token {
            intent = intent.with_gateway_session(token, Some(gateway_order_id.to_string()));
        }
        f.intents.save(&intent).await.unwrap();
        order
    }

    fn command(order: &CommerceOrder, token: Option<&str>) -> ReconcileReturnCommand {
        ReconcileReturnCommand {
            commerce_order: order.clone(),
            token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn recovers_token_from_intent_and_activates() {
        let f = fixture();
        let order = saved_intent(&f, Some("tok")).await;
        f.gateway
            .set_status("tok", MockPaymentGateway::report(2, Some(&order), "42", None));

        let result = f.handler.handle(command(&order, None)).await.unwrap();

        match result {
            ReconcileReturnResult::Paid {
                membership,
                gateway_order_id,
                ..
            } => {
                assert_eq!(membership.plan_id, "annual");
                assert_eq!(gateway_order_id.as_deref(), Some("42"));
            }
            other => panic!("expected paid, got {:?}", other),
        }
        let intent = f.intents.find_by_commerce_order(&order).await.unwrap().unwrap();
        assert_eq!(intent.status, IntentStatus::Paid);
    }

    #[tokio::test]
    async fn uses_token_from_query_when_given() {
        let f = fixture();
        let order = saved_intent(&f, None).await;
        f.gateway
            .set_status("from-query", MockPaymentGateway::report(2, Some(&order), "43", None));

        let result = f.handler.handle(command(&order, Some("from-query"))).await.unwrap();

        assert!(matches!(result, ReconcileReturnResult::Paid { .. }));
        assert_eq!(f.gateway.status_calls("from-query"), 1);
    }

    #[tokio::test]
    async fn unknown_order_without_token_is_not_found() {
        let f = fixture();
        let order = CommerceOrder::parse("FV|monthly|a@x.com|1").unwrap();

        let err = f.handler.handle(command(&order, None)).await.unwrap_err();

        assert!(matches!(err, PipelineError::IntentNotFound(_)));
    }

    #[tokio::test]
    async fn not_paid_renders_pending_status() {
        let f = fixture();
        let order = saved_intent(&f, Some("tok")).await;
        f.gateway
            .set_status("tok", MockPaymentGateway::report(3, Some(&order), "42", None));

        let result = f.handler.handle(command(&order, None)).await.unwrap();

        match result {
            ReconcileReturnResult::Pending { status, .. } => assert_eq!(status, "failed"),
            other => panic!("expected pending, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn gateway_outage_renders_pending() {
        let f = fixture();
        let order = saved_intent(&f, Some("tok")).await;
        f.gateway.fail_get_status(PaymentError::http_status(503, "down"));

        let result = f.handler.handle(command(&order, None)).await.unwrap();

        assert!(matches!(result, ReconcileReturnResult::Pending { ref status, .. } if status == "pending"));
    }

    #[tokio::test]
    async fn query_token_of_another_checkout_is_rejected_before_gateway_call() {
        let f = fixture();
        let lifetime = saved_plan_intent(&f, "lifetime", Some("tok-lifetime"), "90").await;
        let monthly = saved_plan_intent(&f, "monthly", Some("tok-monthly"), "91").await;
        f.gateway
            .set_status("tok-monthly", MockPaymentGateway::report(2, Some(&monthly), "91", None));

        let err = f.handler.handle(command(&lifetime, Some("tok-monthly"))).await.unwrap_err();

        assert!(matches!(err, PipelineError::TokenMismatch(_)));
        assert_eq!(f.gateway.status_calls("tok-monthly"), 0);
        assert_eq!(f.memberships.count().await, 0);
        let intent = f.intents.find_by_commerce_order(&lifetime).await.unwrap().unwrap();
        assert_eq!(intent.status, IntentStatus::Created);
    }

    #[tokio::test]
    async fn paid_token_for_another_order_cannot_settle_order_without_stored_token() {
        let f = fixture();
        // Intent whose gateway session was never stored.
        let lifetime = saved_plan_intent(&f, "lifetime", None, "90").await;
        let monthly = saved_plan_intent(&f, "monthly", Some("tok-monthly"), "91").await;
        f.gateway
            .set_status("tok-monthly", MockPaymentGateway::report(2, Some(&monthly), "91", None));

        let err = f.handler.handle(command(&lifetime, Some("tok-monthly"))).await.unwrap_err();

        assert!(matches!(err, PipelineError::OrderMismatch { .. }));
        assert_eq!(f.memberships.count().await, 0);
        let intent = f.intents.find_by_commerce_order(&lifetime).await.unwrap().unwrap();
        assert_eq!(intent.status, IntentStatus::Created);
        let monthly_intent = f.intents.find_by_commerce_order(&monthly).await.unwrap().unwrap();
        assert_eq!(monthly_intent.status, IntentStatus::Created);
    }

    #[tokio::test]
    async fn matching_query_token_is_accepted() {
        let f = fixture();
        let order = saved_intent(&f, Some("tok")).await;
        f.gateway
            .set_status("tok", MockPaymentGateway::report(2, Some(&order), "42", None));

        let result = f.handler.handle(command(&order, Some(" tok "))).await.unwrap();

        assert!(matches!(result, ReconcileReturnResult::Paid { .. }));
    }
}
