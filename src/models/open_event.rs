use crate::schema::opens;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::{Insertable, Queryable};

#[derive(Debug, Clone, PartialEq, Queryable, Insertable)]
#[diesel(table_name = opens)]
pub struct OpenEvent {
    pub email_id: String,
    pub date: DateTime<Utc>,
    pub project: String,
}
