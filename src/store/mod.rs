mod memory;
mod postgres;

use crate::domain::TrackedEmail;
use crate::models::{OpenEvent, SentEmail};
use crate::routes::error_chain_fmt;
use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
pub use memory::InMemoryEmailLog;
pub use postgres::{PgEmailLog, QueryTimeout, TrackerDbConn, MIGRATIONS};
use std::time::Duration;

/// Append-only log of sent emails and their opens.
#[async_trait]
pub trait EmailLog: Send + Sync {
    async fn record_send(&self, sent: SentEmail) -> Result<(), PersistenceError>;

    /// The most recent send to `email`, if there was any.
    async fn latest_send(&self, email: &TrackedEmail)
        -> Result<Option<SentEmail>, PersistenceError>;

    async fn record_open(&self, open: OpenEvent) -> Result<(), PersistenceError>;
}

#[derive(thiserror::Error)]
pub enum PersistenceError {
    #[error("A database constraint was violated.")]
    ConstraintViolation(#[source] DieselError),
    #[error("The tracking tables do not exist.")]
    MissingSchema(#[source] DieselError),
    #[error("The query did not complete within {0:?}.")]
    Timeout(Duration),
    #[error("No database connection could be acquired from the pool.")]
    Unavailable,
    #[error("Failed to execute query.")]
    Query(#[source] DieselError),
}

impl std::fmt::Debug for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<DieselError> for PersistenceError {
    fn from(e: DieselError) -> Self {
        let (is_constraint, is_missing_table) = match &e {
            DieselError::DatabaseError(kind, info) => (
                matches!(
                    kind,
                    DatabaseErrorKind::UniqueViolation
                        | DatabaseErrorKind::ForeignKeyViolation
                        | DatabaseErrorKind::NotNullViolation
                        | DatabaseErrorKind::CheckViolation
                ),
                is_undefined_table(info.message()),
            ),
            _ => (false, false),
        };
        if is_constraint {
            PersistenceError::ConstraintViolation(e)
        } else if is_missing_table {
            PersistenceError::MissingSchema(e)
        } else {
            PersistenceError::Query(e)
        }
    }
}

// Postgres reports SQLSTATE 42P01 as `relation "opens" does not exist`.
fn is_undefined_table(message: &str) -> bool {
    message.starts_with("relation ") && message.ends_with("does not exist")
}
