use crate::domain::{ProjectName, TrackedEmail};
use crate::email::{ComposeError, EmailClient, MailComposer, TransmissionError};
use crate::models::SentEmail;
use crate::routes::error_chain_fmt;
use crate::store::{EmailLog, PersistenceError};
use chrono::Utc;
use rocket::http::RawStr;
use std::sync::Arc;

/// A validated email waiting to be sent.
pub struct OutgoingEmail {
    pub recipient: TrackedEmail,
    pub subject: String,
    pub body: MessageBody,
    pub project: ProjectName,
}

pub enum MessageBody {
    Html(String),
    Template {
        name: String,
        variables: serde_json::Map<String, serde_json::Value>,
    },
}

#[derive(thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error("Failed to transmit the email.")]
    Transmission(#[from] TransmissionError),
    #[error("The email was sent but could not be recorded.")]
    Persistence(#[from] PersistenceError),
}

impl std::fmt::Debug for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Composes, transmits and records tracked emails.
pub struct Delivery {
    email_client: Arc<dyn EmailClient>,
    composer: MailComposer,
    base_url: String,
}

impl Delivery {
    pub fn new(email_client: Arc<dyn EmailClient>, composer: MailComposer, base_url: String) -> Self {
        Self {
            email_client,
            composer,
            base_url,
        }
    }

    /// Address of the pixel that registers an open for `email`.
    pub fn tracking_url(&self, email: &TrackedEmail) -> String {
        format!(
            "{}/track/{}",
            self.base_url.trim_end_matches('/'),
            RawStr::new(email.as_ref()).percent_encode()
        )
    }

    /// Sends one email and, once the relay has accepted it, appends one
    /// `sent_emails` row. A failed transmission leaves the log untouched.
    #[tracing::instrument(
        name = "Sending a tracked email",
        skip(self, email_log, email),
        fields(
            recipient = %email.recipient,
            project = %email.project.as_ref()
        )
    )]
    pub async fn send(
        &self,
        email_log: &dyn EmailLog,
        email: OutgoingEmail,
    ) -> Result<SentEmail, SendError> {
        let OutgoingEmail {
            recipient,
            subject,
            body,
            project,
        } = email;

        let html = match body {
            MessageBody::Html(content) => content,
            MessageBody::Template { name, variables } => self.composer.render(&name, variables)?,
        };
        let html = with_tracking_pixel(&html, &self.tracking_url(&recipient));

        self.email_client
            .send_email(&recipient, &subject, &html)
            .await?;

        let sent = SentEmail {
            email_id: recipient.as_ref().to_string(),
            date: Utc::now(),
            project: project.as_ref().to_string(),
        };
        email_log.record_send(sent.clone()).await?;
        Ok(sent)
    }
}

fn with_tracking_pixel(html: &str, tracking_url: &str) -> String {
    let pixel = format!(
        r#"<img src="{}" width="1" height="1" alt="">"#,
        tracking_url
    );
    // ASCII lowercasing keeps byte offsets intact.
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(index) => format!("{}{}{}", &html[..index], pixel, &html[index..]),
        None => format!("{}{}", html, pixel),
    }
}
