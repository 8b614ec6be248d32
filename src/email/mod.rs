mod composer;
mod smtp_email_client;

use crate::domain::TrackedEmail;
use crate::routes::error_chain_fmt;
use async_trait::async_trait;
pub use composer::{ComposeError, MailComposer};
pub use smtp_email_client::SmtpEmailClient;

/// Transmits a single HTML email.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &TrackedEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), TransmissionError>;
}

#[derive(thiserror::Error)]
pub enum TransmissionError {
    #[error("Failed to build the message: {0}")]
    Message(String),
    #[error("The SMTP relay did not answer in time.")]
    Timeout,
    #[error("The SMTP relay refused the message.")]
    Smtp(#[source] anyhow::Error),
}

impl std::fmt::Debug for TransmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
