// Neither table has a primary key; diesel only needs one declared, so the
// natural (email_id, date) pair stands in for it.

diesel::table! {
    sent_emails (email_id, date) {
        email_id -> Varchar,
        date -> Timestamptz,
        project -> Varchar,
    }
}

diesel::table! {
    opens (email_id, date) {
        email_id -> Varchar,
        date -> Timestamptz,
        project -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(sent_emails, opens);
