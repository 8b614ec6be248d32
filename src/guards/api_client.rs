use crate::guards::{BasicAuth, OrStatus};
use anyhow::anyhow;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

/// The one set of credentials allowed to send tracked emails.
pub struct ApiCredentials {
    username: String,
    password: Secret<String>,
}

impl ApiCredentials {
    pub fn new(username: String, password: Secret<String>) -> Self {
        Self { username, password }
    }

    fn accepts(&self, auth: &BasicAuth) -> bool {
        // Evaluate both comparisons so a wrong username takes as long as a
        // wrong password.
        let username_matches = constant_time_eq(self.username.as_bytes(), auth.username.as_bytes());
        let password_matches = constant_time_eq(
            self.password.expose_secret().as_bytes(),
            auth.password.expose_secret().as_bytes(),
        );
        username_matches & password_matches
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// A caller that presented the configured API credentials.
pub struct ApiClient {
    pub username: String,
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ApiClient {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let credentials = try_outcome!(request
            .rocket()
            .state::<ApiCredentials>()
            .or_status(Status::InternalServerError, "API credentials are not configured."));
        let basic_auth = try_outcome!(request.guard::<BasicAuth>().await);

        if credentials.accepts(&basic_auth) {
            Outcome::Success(ApiClient {
                username: basic_auth.username,
                _private: (),
            })
        } else {
            Outcome::Error((
                Status::Unauthorized,
                anyhow!("Invalid username or password."),
            ))
        }
    }
}
