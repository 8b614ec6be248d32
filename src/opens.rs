use crate::domain::TrackedEmail;
use crate::models::OpenEvent;
use crate::routes::error_chain_fmt;
use crate::store::{EmailLog, PersistenceError};
use chrono::Utc;

#[derive(thiserror::Error)]
pub enum OpenError {
    #[error("No email was sent to {0}.")]
    NotFound(TrackedEmail),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl std::fmt::Debug for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Appends one open for `email`, attributed to the project of the most recent
/// email sent to that address.
///
/// Every call appends a row: reloading the pixel counts as another open.
/// The lookup and the insert are two separate statements, so a send that
/// lands between them is not seen by this call.
#[tracing::instrument(name = "Registering an email open", skip(email_log))]
pub async fn register_open(
    email_log: &dyn EmailLog,
    email: &TrackedEmail,
) -> Result<OpenEvent, OpenError> {
    let sent = email_log
        .latest_send(email)
        .await?
        .ok_or_else(|| OpenError::NotFound(email.clone()))?;

    let open = OpenEvent {
        email_id: sent.email_id,
        date: Utc::now(),
        project: sent.project,
    };
    email_log.record_open(open.clone()).await?;
    Ok(open)
}
