//! ConfirmPaymentHandler - Push path: gateway notifications.
//!
//! The gateway expects an answer within a few seconds, so handling is split
//! in two. `accept` runs inline and decides the HTTP answer. `handle` does
//! the settlement afterwards and only logs its outcome.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::{NotificationError, PipelineError, SettlePaymentCommand, SettlePaymentHandler, SettlePaymentResult, SettlementSource};
use crate::domain::gateway::{SignatureEngine, SignatureError, SIGNATURE_PARAM};

/// Parameter carrying the gateway token.
pub const TOKEN_PARAM: &str = "token";

/// A notification that passed the inline checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedNotification {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    /// Every parameter of the notification, whatever its transport encoding.
    pub params: BTreeMap<String, String>,
}

pub struct ConfirmPaymentHandler {
    settlement: Arc<SettlePaymentHandler>,
    /// Verifies `s` on inbound notifications when set.
    verifier: Option<SignatureEngine>,
}

impl ConfirmPaymentHandler {
    pub fn new(settlement: Arc<SettlePaymentHandler>, verifier: Option<SignatureEngine>) -> Self {
        Self { settlement, verifier }
    }

    /// Extracts the token and, when enabled and present, checks the signature.
    pub fn accept(&self, cmd: &ConfirmPaymentCommand) -> Result<AcceptedNotification, NotificationError> {
        let token = cmd
            .params
            .get(TOKEN_PARAM)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .ok_or(NotificationError::MissingToken)?;

        if let Some(verifier) = &self.verifier {
            if cmd.params.contains_key(SIGNATURE_PARAM) {
                match verifier.verify(&cmd.params) {
                    Ok(()) => {}
                    Err(SignatureError::Mismatch) | Err(SignatureError::Missing) => {
                        warn!(token = %token, "Notification signature mismatch");
                        return Err(NotificationError::InvalidSignature);
                    }
                    Err(SignatureError::InvalidKey(reason)) => {
                        // Settlement still queries the gateway for the real status.
                        error!(reason = %reason, "Cannot verify notification signature");
                    }
                }
            }
        }

        Ok(AcceptedNotification {
            token: token.to_string(),
        })
    }

    /// Runs the settlement for an accepted notification.
    pub async fn handle(&self, notification: AcceptedNotification) -> Result<SettlePaymentResult, PipelineError> {
        let token = notification.token.clone();
        let result = self
            .settlement
            .handle(SettlePaymentCommand {
                token: notification.token,
                commerce_order: None,
                source: SettlementSource::Notification,
            })
            .await;

        match &result {
            Ok(SettlePaymentResult::Activated { membership, .. }) => {
                info!(token = %token, email = %membership.email, "Notification settled as paid")
            }
            Ok(SettlePaymentResult::NotPaid { status, .. }) => {
                info!(token = %token, status = %status.label(), "Notification settled as not paid")
            }
            Err(e) => error!(token = %token, error = %e, "Notification settlement failed"),
        }
        result
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
    use crate::domain::checkout::CommerceOrder;
    use crate::domain::foundation::{EmailAddress, Timestamp};
    use crate::ports::MembershipRepository;
    use secrecy::SecretString;

    fn settlement(gateway: &MockPaymentGateway, memberships: Arc<InMemoryMembershipRepository>) -> Arc<SettlePaymentHandler> {
        let intents = Arc::new(InMemoryIntentRepository::new());
        let audit = Arc::new(InMemoryPaymentAuditRepository::new());
        Arc::new(SettlePaymentHandler::new(
            Arc::new(gateway.clone()),
            intents.clone(),
            audit.clone(),
            Arc::new(ActivateMembershipHandler::new(memberships, intents, audit)),
            Arc::new(ProvisionAccountHandler::new(
                Arc::new(InMemoryActivationTokenRepository::new()),
                Arc::new(RecordingMailer::new()),
                "https://app.example",
            )),
        ))
    }

    fn handler(verifier: Option<SignatureEngine>) -> ConfirmPaymentHandler {
        let gateway = MockPaymentGateway::new();
        ConfirmPaymentHandler::new(settlement(&gateway, Arc::new(InMemoryMembershipRepository::new())), verifier)
    }

    fn params(pairs: &[(&str, &str)]) -> ConfirmPaymentCommand {
        ConfirmPaymentCommand {
            params: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    fn engine() -> SignatureEngine {
        SignatureEngine::new(SecretString::new("notify-secret".to_string()))
    }

    #[test]
    fn accepts_token_without_signature() {
        let accepted = handler(Some(engine())).accept(&params(&[("token", " abc ")])).unwrap();
        assert_eq!(accepted.token, "abc");
    }

    #[test]
    fn rejects_missing_or_blank_token() {
        let handler = handler(None);
        assert_eq!(handler.accept(&params(&[])), Err(NotificationError::MissingToken));
        assert_eq!(
            handler.accept(&params(&[("token", "  ")])),
            Err(NotificationError::MissingToken)
        );
    }

    #[test]
    fn verifies_signature_when_enabled() {
        let handler = handler(Some(engine()));
        let mut map = BTreeMap::new();
        map.insert("token".to_string(), "abc".to_string());
        let signature = engine().sign(&map).unwrap();

        assert!(handler.accept(&params(&[("token", "abc"), ("s", &signature)])).is_ok());
        assert_eq!(
            handler.accept(&params(&[("token", "abc"), ("s", "deadbeef")])),
            Err(NotificationError::InvalidSignature)
        );
    }

    #[test]
    fn ignores_signature_when_verification_disabled() {
        assert!(handler(None).accept(&params(&[("token", "abc"), ("s", "bogus")])).is_ok());
    }

    #[tokio::test]
    async fn settles_accepted_notification() {
        let gateway = MockPaymentGateway::new();
        let memberships = Arc::new(InMemoryMembershipRepository::new());
        let handler = ConfirmPaymentHandler::new(settlement(&gateway, memberships.clone()), None);
        let email = EmailAddress::parse("a@x.com").unwrap();
        let order = CommerceOrder::encode("monthly", &email, &Timestamp::now());
        gateway.set_status("abc", MockPaymentGateway::report(2, Some(&order), "9", None));

        let accepted = handler.accept(&params(&[("token", "abc")])).unwrap();
        let result = handler.handle(accepted).await.unwrap();

        assert!(matches!(result, SettlePaymentResult::Activated { .. }));
        assert!(memberships.find_by_email(&email).await.unwrap().is_some());
    }
}
