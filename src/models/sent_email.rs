use crate::schema::sent_emails;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::{Insertable, Queryable};

/// One row of `sent_emails`: an email transmitted to `email_id` for `project`.
#[derive(Debug, Clone, PartialEq, Queryable, Insertable)]
#[diesel(table_name = sent_emails)]
pub struct SentEmail {
    pub email_id: String,
    pub date: DateTime<Utc>,
    pub project: String,
}
