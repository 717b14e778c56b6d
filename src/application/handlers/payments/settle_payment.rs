//! SettlePaymentHandler - Shared settlement sequence for both payment paths.
//!
//! Given a gateway token, the sequence is:
//!
//! 1. Query the gateway for the payment status.
//! 2. Check that the token, the order the caller named, the order the
//!    gateway reports and the stored intent all describe one checkout.
//! 3. Record the raw status on the intent and in the audit trail (best effort).
//! 4. Not paid: move the intent to `pending`/`failed` and stop.
//! 5. Paid: resolve plan and email (intent store, then commerce order, then
//!    payer), activate the membership, then provision account access once.
//!
//! Activation is gated by a one-time settlement claim, so running the
//! sequence again for the same token, from either path, never writes the
//! membership twice.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::PipelineError;
use crate::application::handlers::account::{ProvisionAccountCommand, ProvisionAccountHandler, ProvisionAccountResult};
use crate::application::handlers::membership::{ActivateMembershipCommand, ActivateMembershipHandler};
use crate::domain::checkout::{CommerceOrder, IntentStatus, PaymentIntent};
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::domain::gateway::GatewayPaymentStatus;
use crate::domain::membership::Membership;
use crate::ports::{IntentRepository, PaymentAuditRepository, PaymentGateway, PaymentRecord, PaymentStatusReport};

/// Which path triggered the settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementSource {
    /// Gateway server-to-server notification.
    Notification,
    /// Payer's browser returning from the gateway.
    Return,
}

impl std::fmt::Display for SettlementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementSource::Notification => f.write_str("notification"),
            SettlementSource::Return => f.write_str("return"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettlePaymentCommand {
    pub token: String,
    /// Order the caller already knows, if any.
    pub commerce_order: Option<CommerceOrder>,
    pub source: SettlementSource,
}

#[derive(Debug, Clone)]
pub enum SettlePaymentResult {
    /// Gateway reports a non-paid status; no membership was touched.
    NotPaid {
        status: GatewayPaymentStatus,
        commerce_order: Option<CommerceOrder>,
    },
    Activated {
        membership: Membership,
        commerce_order: Option<CommerceOrder>,
        gateway_order_id: Option<String>,
        /// This settlement won the claim on the payment and wrote the membership.
        first_activation: bool,
        /// Present when account provisioning ran and stored a token.
        provisioning: Option<ProvisionAccountResult>,
    },
}

/// Handler running the settlement sequence.
pub struct SettlePaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    intents: Arc<dyn IntentRepository>,
    audit: Arc<dyn PaymentAuditRepository>,
    activator: Arc<ActivateMembershipHandler>,
    provisioner: Arc<ProvisionAccountHandler>,
}

impl SettlePaymentHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        intents: Arc<dyn IntentRepository>,
        audit: Arc<dyn PaymentAuditRepository>,
        activator: Arc<ActivateMembershipHandler>,
        provisioner: Arc<ProvisionAccountHandler>,
    ) -> Self {
        Self {
            gateway,
            intents,
            audit,
            activator,
            provisioner,
        }
    }

    pub async fn handle(&self, cmd: SettlePaymentCommand) -> Result<SettlePaymentResult, PipelineError> {
        let report = self.gateway.get_status(&cmd.token).await.map_err(|e| {
            warn!(token = %cmd.token, source = %cmd.source, error = %e, "Gateway status query failed");
            PipelineError::GatewayUnavailable(e)
        })?;

        let intent = self.find_intent(&cmd, &report).await;
        check_attribution(&cmd, intent.as_ref(), &report)?;

        let commerce_order = intent
            .as_ref()
            .map(|i| i.commerce_order.clone())
            .or_else(|| report.commerce_order.clone())
            .or_else(|| cmd.commerce_order.clone());

        self.record_status(commerce_order.as_ref(), &report).await;

        if !report.status.is_paid() {
            return self.settle_unpaid(&cmd, commerce_order, report.status).await;
        }

        let (plan_id, email) = resolve_checkout(intent.as_ref(), commerce_order.as_ref(), &report).map_err(|missing| {
            let order = commerce_order.as_ref().map(|o| o.as_str().to_string()).unwrap_or_default();
            error!(
                commerce_order = %order,
                gateway_order_id = ?report.gateway_order_id,
                missing,
                "Paid order cannot be attributed; manual reconciliation required"
            );
            PipelineError::DataIncomplete {
                commerce_order: order,
                missing,
            }
        })?;

        let activation = self
            .activator
            .handle(ActivateMembershipCommand {
                email: email.clone(),
                plan_id,
                start_at: Timestamp::now(),
                commerce_order: commerce_order.clone(),
                settlement_key: settlement_key(&cmd.token, intent.as_ref(), &report),
                already_settled: intent.as_ref().is_some_and(|i| i.status == IntentStatus::Paid),
            })
            .await
            .map_err(|e| {
                error!(email = %email, source = %cmd.source, error = %e, "Membership activation failed");
                PipelineError::Persistence(e)
            })?;

        let provisioning = if activation.first_activation {
            match self.provisioner.handle(ProvisionAccountCommand { email: email.clone() }).await {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(email = %email, error = %e, "Account provisioning failed");
                    None
                }
            }
        } else {
            None
        };

        info!(
            email = %email,
            source = %cmd.source,
            first_activation = activation.first_activation,
            "Payment settled"
        );

        Ok(SettlePaymentResult::Activated {
            membership: activation.membership,
            commerce_order,
            gateway_order_id: report
                .gateway_order_id
                .or_else(|| intent.and_then(|i| i.gateway_order_id)),
            first_activation: activation.first_activation,
            provisioning,
        })
    }

    /// Looks the intent up by the gateway's order first: it is the one the
    /// token actually paid for.
    async fn find_intent(&self, cmd: &SettlePaymentCommand, report: &PaymentStatusReport) -> Option<PaymentIntent> {
        let by_order = report.commerce_order.as_ref().or(cmd.commerce_order.as_ref());
        if let Some(order) = by_order {
            match self.intents.find_by_commerce_order(order).await {
                Ok(Some(intent)) => return Some(intent),
                Ok(None) => {}
                Err(e) => warn!(commerce_order = %order, error = %e, "Intent lookup failed"),
            }
        }

        match self.intents.find_by_gateway_token(&cmd.token).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(token = %cmd.token, error = %e, "Intent lookup by token failed");
                None
            }
        }
    }

    async fn record_status(&self, commerce_order: Option<&CommerceOrder>, report: &PaymentStatusReport) {
        if let Some(order) = commerce_order {
            match self.intents.record_gateway_status(order, &report.raw).await {
                Ok(true) => {}
                Ok(false) => debug!(commerce_order = %order, "No intent to record gateway status on"),
                Err(e) => warn!(commerce_order = %order, error = %e, "Failed to record gateway status"),
            }
        }

        if let Some(gateway_order_id) = &report.gateway_order_id {
            let record = PaymentRecord {
                gateway_order_id: gateway_order_id.clone(),
                commerce_order: commerce_order.cloned(),
                status: report.status.label(),
                raw: report.raw.clone(),
                recorded_at: Timestamp::now(),
            };
            if let Err(e) = self.audit.record(&record).await {
                warn!(gateway_order_id = %gateway_order_id, error = %e, "Failed to write payment audit record");
            }
        }
    }

    async fn settle_unpaid(
        &self,
        cmd: &SettlePaymentCommand,
        commerce_order: Option<CommerceOrder>,
        status: GatewayPaymentStatus,
    ) -> Result<SettlePaymentResult, PipelineError> {
        if let Some(order) = &commerce_order {
            if let Err(e) = self.intents.transition_status(order, status.intent_status()).await {
                warn!(commerce_order = %order, error = %e, "Failed to update intent status");
            }
        }
        info!(
            token = %cmd.token,
            source = %cmd.source,
            status = %status.label(),
            "Payment not paid"
        );
        Ok(SettlePaymentResult::NotPaid { status, commerce_order })
    }
}

/// Rejects a settlement whose sources disagree about which checkout was paid.
fn check_attribution(
    cmd: &SettlePaymentCommand,
    intent: Option<&PaymentIntent>,
    report: &PaymentStatusReport,
) -> Result<(), PipelineError> {
    let known = [
        cmd.commerce_order.as_ref(),
        intent.map(|i| &i.commerce_order),
    ];
    let reported = report.commerce_order.as_ref().or(cmd.commerce_order.as_ref());

    if let Some(reported) = reported {
        if let Some(expected) = known.into_iter().flatten().find(|order| *order != reported) {
            warn!(
                token = %cmd.token,
                source = %cmd.source,
                expected = %expected,
                reported = %reported,
                "Settlement orders disagree"
            );
            return Err(PipelineError::OrderMismatch {
                expected: expected.to_string(),
                reported: reported.to_string(),
            });
        }
    }

    if let Some(intent) = intent {
        if intent.gateway_token.as_deref().is_some_and(|stored| stored != cmd.token) {
            warn!(
                token = %cmd.token,
                source = %cmd.source,
                commerce_order = %intent.commerce_order,
                "Token does not belong to the intent"
            );
            return Err(PipelineError::TokenMismatch(intent.commerce_order.to_string()));
        }
    }

    Ok(())
}

/// Ledger key for a paid payment: the gateway order id, or the token when
/// the gateway did not report one.
fn settlement_key(token: &str, intent: Option<&PaymentIntent>, report: &PaymentStatusReport) -> String {
    report
        .gateway_order_id
        .clone()
        .or_else(|| intent.and_then(|i| i.gateway_order_id.clone()))
        .unwrap_or_else(|| format!("token:{}", token))
}

/// Resolves plan and email, preferring the stored intent, then the commerce
/// order codec, then the payer reported by the gateway.
///
/// Returns the name of the first field that cannot be resolved.
fn resolve_checkout(
    intent: Option<&PaymentIntent>,
    commerce_order: Option<&CommerceOrder>,
    report: &PaymentStatusReport,
) -> Result<(String, EmailAddress), &'static str> {
    let decoded = commerce_order.and_then(CommerceOrder::decode).unwrap_or_default();

    let plan_id = intent
        .map(|i| i.plan_id.clone())
        .filter(|plan| !plan.trim().is_empty())
        .or(decoded.plan_id)
        .ok_or("plan_id")?;

    let email = intent
        .map(|i| i.email.clone())
        .or(decoded.email)
        .or_else(|| {
            report
                .payer_email
                .as_deref()
                .and_then(|payer| EmailAddress::parse(payer).ok())
        })
        .ok_or("email")?;

    Ok((plan_id, email))
}
