use crate::delivery::{Delivery, MessageBody, OutgoingEmail, SendError};
use crate::domain::{ProjectName, TrackedEmail};
use crate::email::ComposeError;
use crate::guards::ApiClient;
use crate::routes::{error_chain_fmt, error_response};
use crate::store::PgEmailLog;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct BodyData {
    recipient_email: String,
    subject: String,
    project_name: String,
    #[serde(flatten)]
    content: Content,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum Content {
    Html {
        content: String,
    },
    Template {
        template: String,
        #[serde(default)]
        variables: serde_json::Map<String, serde_json::Value>,
    },
}

#[derive(serde::Serialize)]
pub struct SendReceipt {
    email_id: String,
    project: String,
    tracking_url: String,
}

impl TryFrom<BodyData> for OutgoingEmail {
    type Error = String;

    fn try_from(body: BodyData) -> Result<Self, Self::Error> {
        let recipient = TrackedEmail::parse(body.recipient_email)?;
        let project = ProjectName::parse(body.project_name)?;
        let body_source = match body.content {
            Content::Html { content } => MessageBody::Html(content),
            Content::Template {
                template,
                variables,
            } => MessageBody::Template {
                name: template,
                variables,
            },
        };
        Ok(OutgoingEmail {
            recipient,
            subject: body.subject,
            body: body_source,
            project,
        })
    }
}

#[tracing::instrument(
    name = "Sending a tracked email on request",
    skip(body, api_client, email_log, delivery),
    fields(
        request_id = %Uuid::new_v4(),
        api_username = %api_client.username,
        recipient_email = %body.recipient_email,
        project_name = %body.project_name
    )
)]
#[post("/emails", data = "<body>")]
pub async fn send_email(
    body: Json<BodyData>,
    api_client: ApiClient,
    email_log: PgEmailLog<'_>,
    delivery: &State<Delivery>,
) -> Result<Json<SendReceipt>, SendEmailError> {
    let email: OutgoingEmail = body
        .into_inner()
        .try_into()
        .map_err(SendEmailError::ValidationError)?;
    let tracking_url = delivery.tracking_url(&email.recipient);
    let sent = delivery.send(&email_log, email).await?;
    Ok(Json(SendReceipt {
        email_id: sent.email_id,
        project: sent.project,
        tracking_url,
    }))
}

#[derive(thiserror::Error)]
pub enum SendEmailError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    SendFailed(#[from] SendError),
}

impl std::fmt::Debug for SendEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for SendEmailError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("SendEmailError: {:?}", self);
        let status = match &self {
            SendEmailError::ValidationError(_)
            | SendEmailError::SendFailed(SendError::Compose(ComposeError::TemplateNotFound(_))) => {
                Status::BadRequest
            }
            SendEmailError::SendFailed(_) => Status::InternalServerError,
        };
        error_response(status, self.to_string())
    }
}
