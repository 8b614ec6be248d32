use crate::domain::TrackedEmail;
use crate::opens::{register_open, OpenError};
use crate::pixel::TrackingPixel;
use crate::routes::{error_chain_fmt, error_response};
use crate::store::PgEmailLog;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, State};
use uuid::Uuid;

/// Registers an open of the email sent to `email_id` and answers with the
/// tracking pixel.
///
/// The address is validated before any query runs.
#[tracing::instrument(
    name = "Tracking an email open",
    skip(email_log, pixel),
    fields(request_id = %Uuid::new_v4())
)]
#[get("/track/<email_id>")]
pub async fn track_open(
    email_id: &str,
    email_log: PgEmailLog<'_>,
    pixel: &State<TrackingPixel>,
) -> Result<(ContentType, Vec<u8>), TrackError> {
    let email = TrackedEmail::parse(email_id.to_string()).map_err(TrackError::ValidationError)?;
    register_open(&email_log, &email).await?;
    pixel.load().await.map_err(TrackError::PixelUnavailable)
}

#[derive(thiserror::Error)]
pub enum TrackError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Email not found.")]
    EmailNotFound,
    #[error("The tracking pixel could not be loaded.")]
    PixelUnavailable(#[source] std::io::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<OpenError> for TrackError {
    fn from(e: OpenError) -> Self {
        match e {
            OpenError::NotFound(_) => TrackError::EmailNotFound,
            OpenError::Persistence(e) => TrackError::UnexpectedError(
                anyhow::Error::new(e).context("Failed to register the open."),
            ),
        }
    }
}

impl std::fmt::Debug for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for TrackError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("TrackError: {:?}", self);
        let status = match &self {
            TrackError::ValidationError(_) | TrackError::EmailNotFound => Status::BadRequest,
            TrackError::PixelUnavailable(_) | TrackError::UnexpectedError(_) => {
                Status::InternalServerError
            }
        };
        error_response(status, self.to_string())
    }
}
