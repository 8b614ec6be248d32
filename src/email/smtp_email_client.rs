use crate::configuration::{EmailClientSettings, SmtpTls};
use crate::domain::TrackedEmail;
use crate::email::{EmailClient, TransmissionError};
use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Sends mail through an authenticated SMTP relay.
///
/// The transport is built without connection pooling: every `send_email`
/// opens its own connection, logs in, transmits and quits.
pub struct SmtpEmailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    timeout: Duration,
}

impl SmtpEmailClient {
    pub fn new(settings: &EmailClientSettings) -> Result<Self, anyhow::Error> {
        let sender: Mailbox = settings
            .sender()
            .map_err(anyhow::Error::msg)?
            .as_ref()
            .parse()
            .context("The sender email cannot be used as a mailbox.")?;

        let builder = match settings.tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .context("Failed to set up an implicit TLS relay.")?,
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .context("Failed to set up a STARTTLS relay.")?
            }
            SmtpTls::None => {
                tracing::warn!(
                    smtp_host = %settings.host,
                    "SMTP traffic will not be encrypted. Only use this with a local relay."
                );
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let timeout = settings.timeout();
        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.expose_secret().clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            transport,
            sender,
            timeout,
        })
    }
}

#[async_trait]
impl EmailClient for SmtpEmailClient {
    #[tracing::instrument(
        name = "Transmitting email over SMTP",
        skip(self, html_content),
        fields(recipient = %recipient)
    )]
    async fn send_email(
        &self,
        recipient: &TrackedEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), TransmissionError> {
        let to: Mailbox = recipient
            .as_ref()
            .parse()
            .map_err(|e: lettre::address::AddressError| TransmissionError::Message(e.to_string()))?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_content.to_string())
            .map_err(|e| TransmissionError::Message(e.to_string()))?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_response)) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!("Failed to send email: {:?}", e);
                Err(TransmissionError::Smtp(e.into()))
            }
            Err(_) => Err(TransmissionError::Timeout),
        }
    }
}
