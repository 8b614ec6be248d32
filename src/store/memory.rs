use crate::domain::TrackedEmail;
use crate::models::{OpenEvent, SentEmail};
use crate::store::{EmailLog, PersistenceError};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// [`EmailLog`] kept in process memory, for tests and local experiments.
#[derive(Default)]
pub struct InMemoryEmailLog {
    sent_emails: Mutex<Vec<SentEmail>>,
    opens: Mutex<Vec<OpenEvent>>,
}

impl InMemoryEmailLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        lock(&self.sent_emails).clone()
    }

    pub fn opens(&self) -> Vec<OpenEvent> {
        lock(&self.opens).clone()
    }
}

// A poisoned lock only means another test thread panicked mid-push.
fn lock<T>(rows: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl EmailLog for InMemoryEmailLog {
    async fn record_send(&self, sent: SentEmail) -> Result<(), PersistenceError> {
        lock(&self.sent_emails).push(sent);
        Ok(())
    }

    async fn latest_send(
        &self,
        email: &TrackedEmail,
    ) -> Result<Option<SentEmail>, PersistenceError> {
        Ok(lock(&self.sent_emails)
            .iter()
            .filter(|sent| sent.email_id == email.as_ref())
            .max_by_key(|sent| sent.date)
            .cloned())
    }

    async fn record_open(&self, open: OpenEvent) -> Result<(), PersistenceError> {
        lock(&self.opens).push(open);
        Ok(())
    }
}
