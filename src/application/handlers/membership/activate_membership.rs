//! ActivateMembershipHandler - Turns a confirmed payment into an active membership.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::checkout::{CommerceOrder, IntentStatus};
use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp};
use crate::domain::membership::Membership;
use crate::ports::{IntentRepository, MembershipRepository, PaymentAuditRepository};

/// Command to activate a membership for a confirmed payment.
#[derive(Debug, Clone)]
pub struct ActivateMembershipCommand {
    pub email: EmailAddress,
    pub plan_id: String,
    pub start_at: Timestamp,
    /// Intent that paid for the membership, when known.
    pub commerce_order: Option<CommerceOrder>,
    /// Identifies the paid payment in the settlement ledger.
    pub settlement_key: String,
    /// The intent was already `paid` before this settlement started.
    pub already_settled: bool,
}

/// Result of a successful activation.
#[derive(Debug, Clone)]
pub struct ActivateMembershipResult {
    pub membership: Membership,
    /// True for exactly one caller per paid payment.
    pub first_activation: bool,
}

/// Handler for membership activation.
///
/// A payment activates a membership once. The caller that wins the
/// settlement claim writes the membership; every other caller for the same
/// payment gets the stored row back untouched, so replays never extend or
/// revive a membership.
pub struct ActivateMembershipHandler {
    memberships: Arc<dyn MembershipRepository>,
    intents: Arc<dyn IntentRepository>,
    settlements: Arc<dyn PaymentAuditRepository>,
}

impl ActivateMembershipHandler {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        intents: Arc<dyn IntentRepository>,
        settlements: Arc<dyn PaymentAuditRepository>,
    ) -> Self {
        Self {
            memberships,
            intents,
            settlements,
        }
    }

    /// # Errors
    ///
    /// - `DatabaseError` when the claim or the membership write fails
    /// - `SettlementInProgress` when another caller holds the claim and has
    ///   not written the membership yet
    pub async fn handle(&self, cmd: ActivateMembershipCommand) -> Result<ActivateMembershipResult, DomainError> {
        if cmd.already_settled {
            if let Some(membership) = self.memberships.find_by_email(&cmd.email).await? {
                debug!(email = %cmd.email, plan_id = %membership.plan_id, "Intent already settled, membership left as is");
                return Ok(ActivateMembershipResult {
                    membership,
                    first_activation: false,
                });
            }
        }

        let claimed = self
            .settlements
            .claim_settlement(&cmd.settlement_key, cmd.commerce_order.as_ref(), cmd.start_at)
            .await?;

        if !claimed {
            self.mark_intent_paid(&cmd).await;
            return match self.memberships.find_by_email(&cmd.email).await? {
                Some(membership) => {
                    debug!(email = %cmd.email, settlement_key = %cmd.settlement_key, "Payment already settled");
                    Ok(ActivateMembershipResult {
                        membership,
                        first_activation: false,
                    })
                }
                None => Err(DomainError::new(
                    ErrorCode::SettlementInProgress,
                    "Payment is being settled by another request",
                )
                .with_detail("settlement_key", cmd.settlement_key.clone())),
            };
        }

        let membership = Membership::activate(cmd.email.clone(), &cmd.plan_id, cmd.start_at);
        if let Err(e) = self.memberships.upsert(&membership).await {
            if let Err(release) = self.settlements.release_settlement(&cmd.settlement_key).await {
                error!(
                    settlement_key = %cmd.settlement_key,
                    error = %release,
                    "Settlement claim kept after failed activation; manual reconciliation required"
                );
            }
            return Err(e);
        }

        self.mark_intent_paid(&cmd).await;

        info!(
            email = %membership.email,
            plan_id = %membership.plan_id,
            tier = %membership.tier,
            settlement_key = %cmd.settlement_key,
            "Membership activated"
        );

        Ok(ActivateMembershipResult {
            membership,
            first_activation: true,
        })
    }

    /// The claim already decided the outcome; a lagging intent is repaired
    /// by the next settlement of the same payment.
    async fn mark_intent_paid(&self, cmd: &ActivateMembershipCommand) {
        if let Some(order) = &cmd.commerce_order {
            if let Err(e) = self.intents.transition_status(order, IntentStatus::Paid).await {
                warn!(commerce_order = %order, error = %e, "Failed to mark intent paid");
            }
        }
    }
}
