//! Delivery of signup confirmation codes.
//!
//! - [`ConfirmationMailer`] -- the trait the API depends on.
//! - [`SmtpMailer`] -- sends plain-text mail through `lettre`'s async SMTP transport.
//! - [`LogMailer`] -- writes the code to the log; used when SMTP is not configured.
//! - [`MemoryOutbox`] -- keeps sent codes in memory for tests and local tooling.

pub mod memory;
pub mod smtp;

use async_trait::async_trait;

pub use memory::{MemoryOutbox, SentCode};
pub use smtp::{EmailConfig, SmtpMailer};

/// Subject line of every confirmation email.
pub const CONFIRMATION_SUBJECT: &str = "Confirmation Code";

/// Error type for confirmation mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Something that can deliver a confirmation code to an email address.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    async fn send_code(&self, to_email: &str, code: &str) -> Result<(), MailError>;
}

/// Mailer that only logs the code. Used when no SMTP host is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl ConfirmationMailer for LogMailer {
    async fn send_code(&self, to_email: &str, code: &str) -> Result<(), MailError> {
        tracing::info!(to = to_email, code, "Confirmation code (SMTP not configured)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_never_fails() {
        LogMailer
            .send_code("reader@example.com", "abc-123")
            .await
            .expect("log delivery should succeed");
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn mail_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
