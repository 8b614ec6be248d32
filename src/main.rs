use anyhow::{anyhow, Context};
use email_tracker::configuration::get_configuration;
use email_tracker::email::SmtpEmailClient;
use email_tracker::startup::Application;
use email_tracker::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("email_tracker".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let email_client = SmtpEmailClient::new(&configuration.email_client)?;

    let application = Application::build(&configuration, Arc::new(email_client)).await?;
    application
        .server
        .launch()
        .await
        .map_err(|e| anyhow!("The server stopped with an error: {}", e))?;
    Ok(())
}
