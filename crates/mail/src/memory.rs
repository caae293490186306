//! In-memory outbox mailer.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{ConfirmationMailer, MailError};

/// A code "delivered" to the in-memory outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub to: String,
    pub code: String,
}

/// Records every code instead of sending it.
#[derive(Debug, Default)]
pub struct MemoryOutbox {
    sent: Mutex<Vec<SentCode>>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far, oldest first.
    pub async fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().await.clone()
    }

    /// The most recent code sent to `email`.
    pub async fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == email)
            .map(|m| m.code.clone())
    }
}

#[async_trait]
impl ConfirmationMailer for MemoryOutbox {
    async fn send_code(&self, to_email: &str, code: &str) -> Result<(), MailError> {
        self.sent.lock().await.push(SentCode {
            to: to_email.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}
