//! Payment intent: the durable record of one checkout attempt.

use serde::{Deserialize, Serialize};

use super::CommerceOrder;
use crate::domain::foundation::{EmailAddress, StateMachine, Timestamp, ValidationError};

/// Lifecycle of a payment intent.
///
/// `Paid` is absorbing: once paid, the only permitted transition is the
/// idempotent `Paid -> Paid` re-confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    Created,
    Pending,
    Paid,
    Failed,
}

impl IntentStatus {
    pub const ALL: [IntentStatus; 4] = [
        IntentStatus::Created,
        IntentStatus::Pending,
        IntentStatus::Paid,
        IntentStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Created => "created",
            IntentStatus::Pending => "pending",
            IntentStatus::Paid => "paid",
            IntentStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// States from which `target` may be reached.
    ///
    /// Stores use this to make a status update conditional on the current
    /// row, so concurrent writers cannot move an intent out of `Paid`.
    pub fn sources_of(target: IntentStatus) -> Vec<IntentStatus> {
        Self::ALL
            .into_iter()
            .filter(|source| source.can_transition_to(&target))
            .collect()
    }
}

impl StateMachine for IntentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use IntentStatus::*;
        match self {
            Paid => *target == Paid,
            Created => *target != Created,
            // The gateway is authoritative, so a failed or pending attempt
            // may still settle as paid on a later status query.
            Pending | Failed => *target != Created,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }
}

impl std::fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row per checkout attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub commerce_order: CommerceOrder,
    pub plan_id: String,
    pub email: EmailAddress,
    pub user_id: Option<String>,
    pub gateway_token: Option<String>,
    pub gateway_order_id: Option<String>,
    pub status: IntentStatus,
    /// Last status payload returned by the gateway, kept for audit.
    pub raw_gateway_status: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentIntent {
    /// A freshly created intent, before the gateway has issued a token.
    pub fn new(
        commerce_order: CommerceOrder,
        plan_id: impl Into<String>,
        email: EmailAddress,
        user_id: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            commerce_order,
            plan_id: plan_id.into(),
            email,
            user_id,
            gateway_token: None,
            gateway_order_id: None,
            status: IntentStatus::Created,
            raw_gateway_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the payment session the gateway opened for this intent.
    pub fn with_gateway_session(mut self, token: impl Into<String>, order_id: Option<String>) -> Self {
        self.gateway_token = Some(token.into());
        self.gateway_order_id = order_id;
        self
    }

    /// Moves the intent to `target`.
    ///
    /// Returns `Ok(true)` when the status changed and `Ok(false)` for an
    /// idempotent repeat of the current state.
    pub fn apply_status(&mut self, target: IntentStatus, now: Timestamp) -> Result<bool, ValidationError> {
        let next = self.status.transition_to(target)?;
        let changed = next != self.status;
        self.status = next;
        self.updated_at = now;
        Ok(changed)
    }
}
