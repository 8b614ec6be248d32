mod api_client;
mod basic_auth;
mod email_log;

use anyhow::anyhow;
pub use api_client::*;
pub use basic_auth::*;
use rocket::http::Status;
use rocket::request::Outcome;

trait OrStatus<T> {
    fn or_status(self, status: Status, context: &'static str) -> Outcome<T, anyhow::Error>;
}

impl<T> OrStatus<T> for Option<T> {
    fn or_status(self, status: Status, context: &'static str) -> Outcome<T, anyhow::Error> {
        match self {
            Some(value) => Outcome::Success(value),
            None => Outcome::Error((status, anyhow!(context))),
        }
    }
}
