//! Mailer that records activation emails instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::foundation::EmailAddress;
use crate::ports::{ActivationMailer, MailDelivery, MailError};

/// An activation email that was handed to the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentActivation {
    pub to: EmailAddress,
    pub link: String,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentActivation>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails after being recorded.
    pub fn failing() -> Self {
        let mailer = Self::new();
        mailer.fail.store(true, Ordering::SeqCst);
        mailer
    }

    pub fn sent(&self) -> Vec<SentActivation> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ActivationMailer for RecordingMailer {
    async fn send_activation(&self, to: &EmailAddress, activation_link: &str) -> Result<MailDelivery, MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentActivation {
                to: to.clone(),
                link: activation_link.to_string(),
            });
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Network("mailer configured to fail".to_string()));
        }
        Ok(MailDelivery::Sent { provider_id: None })
    }
}
