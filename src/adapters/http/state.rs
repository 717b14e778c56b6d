//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::{
    ActivateMembershipHandler, CheckoutSettings, ConfirmPaymentHandler, CreateCheckoutHandler, GetMembershipHandler,
    LoginHandler, ProvisionAccountHandler, ReconcileReturnHandler, SetPasswordHandler, SettlePaymentHandler,
};
use crate::domain::gateway::SignatureEngine;
use crate::ports::{
    ActivationMailer, ActivationTokenRepository, CredentialRepository, IntentRepository, MembershipRepository,
    PaymentAuditRepository, PaymentGateway,
};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub intents: Arc<dyn IntentRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub payment_audit: Arc<dyn PaymentAuditRepository>,
    pub activation_tokens: Arc<dyn ActivationTokenRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
    pub mailer: Arc<dyn ActivationMailer>,
    pub checkout: CheckoutSettings,
    /// Verifies inbound notification signatures when set.
    pub notification_verifier: Option<SignatureEngine>,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(self.gateway.clone(), self.intents.clone(), self.checkout.clone())
    }

    pub fn settle_payment_handler(&self) -> Arc<SettlePaymentHandler> {
        let activator = Arc::new(ActivateMembershipHandler::new(
            self.memberships.clone(),
            self.intents.clone(),
            self.payment_audit.clone(),
        ));
        let provisioner = Arc::new(ProvisionAccountHandler::new(
            self.activation_tokens.clone(),
            self.mailer.clone(),
            self.checkout.frontend_url.clone(),
        ));
        Arc::new(SettlePaymentHandler::new(
            self.gateway.clone(),
            self.intents.clone(),
            self.payment_audit.clone(),
            activator,
            provisioner,
        ))
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(self.settle_payment_handler(), self.notification_verifier.clone())
    }

    pub fn reconcile_return_handler(&self) -> ReconcileReturnHandler {
        ReconcileReturnHandler::new(self.intents.clone(), self.settle_payment_handler())
    }

    pub fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(self.memberships.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.memberships.clone(), self.credentials.clone())
    }

    pub fn set_password_handler(&self) -> SetPasswordHandler {
        SetPasswordHandler::new(self.activation_tokens.clone(), self.credentials.clone())
    }
}
