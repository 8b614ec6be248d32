use crate::guards::OrStatus;
use crate::store::{PgEmailLog, QueryTimeout};
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

// Hands out a pool handle only; no connection is checked out until the first
// query, so handlers can validate their input before touching the database.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for PgEmailLog<'r> {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let query_timeout = try_outcome!(request
            .rocket()
            .state::<QueryTimeout>()
            .or_status(Status::InternalServerError, "The query timeout is not configured."));
        Outcome::Success(PgEmailLog::new(request.rocket(), *query_timeout))
    }
}
