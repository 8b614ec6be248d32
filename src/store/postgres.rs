use crate::domain::TrackedEmail;
use crate::models::{OpenEvent, SentEmail};
use crate::store::{EmailLog, PersistenceError};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, QueryResult, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use rocket::{Orbit, Rocket};
use rocket_sync_db_pools::database;
use std::time::Duration;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("tracker")]
pub struct TrackerDbConn(PgConnection);

/// Upper bound for a single query, measured from the moment a pooled
/// connection has been acquired.
#[derive(Debug, Clone, Copy)]
pub struct QueryTimeout(pub Duration);

/// [`EmailLog`] backed by the Postgres pool managed by Rocket.
///
/// Holds no connection itself: every operation checks one out of the pool and
/// hands it back when the operation ends, whatever the outcome.
pub struct PgEmailLog<'r> {
    rocket: &'r Rocket<Orbit>,
    query_timeout: Duration,
}

impl<'r> PgEmailLog<'r> {
    pub fn new(rocket: &'r Rocket<Orbit>, query_timeout: QueryTimeout) -> Self {
        Self {
            rocket,
            query_timeout: query_timeout.0,
        }
    }

    async fn run<F, R>(&self, query: F) -> Result<R, PersistenceError>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = TrackerDbConn::get_one(self.rocket)
            .await
            .ok_or(PersistenceError::Unavailable)?;
        match tokio::time::timeout(self.query_timeout, conn.run(query)).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!("Failed to execute query: {:?}", e);
                PersistenceError::from(e)
            }),
            Err(_) => Err(PersistenceError::Timeout(self.query_timeout)),
        }
    }
}

#[async_trait]
impl<'r> EmailLog for PgEmailLog<'r> {
    #[tracing::instrument(name = "Saving sent email in the database", skip(self, sent))]
    async fn record_send(&self, sent: SentEmail) -> Result<(), PersistenceError> {
        use crate::schema::sent_emails;
        self.run(move |c| {
            diesel::insert_into(sent_emails::table)
                .values(&sent)
                .execute(c)
                .map(|_| ())
        })
        .await
    }

    #[tracing::instrument(name = "Get latest sent email", skip(self, email))]
    async fn latest_send(
        &self,
        email: &TrackedEmail,
    ) -> Result<Option<SentEmail>, PersistenceError> {
        use crate::schema::sent_emails::dsl::*;
        let address = email.as_ref().to_string();
        self.run(move |c| {
            sent_emails
                .filter(email_id.eq(address))
                .order(date.desc())
                .first::<SentEmail>(c)
                .optional()
        })
        .await
    }

    #[tracing::instrument(name = "Saving email open in the database", skip(self, open))]
    async fn record_open(&self, open: OpenEvent) -> Result<(), PersistenceError> {
        use crate::schema::opens;
        self.run(move |c| {
            diesel::insert_into(opens::table)
                .values(&open)
                .execute(c)
                .map(|_| ())
        })
        .await
    }
}
