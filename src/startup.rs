use crate::catchers::*;
use crate::configuration::Settings;
use crate::delivery::Delivery;
use crate::email::{EmailClient, MailComposer};
use crate::pixel::TrackingPixel;
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use crate::store::{TrackerDbConn, MIGRATIONS};
use anyhow::anyhow;
use diesel_migrations::MigrationHarness;
use rocket::fairing::AdHoc;
use rocket::{Build, Ignite, Rocket};
use std::sync::Arc;

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    /// Ignites the server: the database pool is opened and the tracking
    /// tables are migrated before this returns.
    pub async fn build(
        configuration: &Settings,
        email_client: Arc<dyn EmailClient>,
    ) -> Result<Application, anyhow::Error> {
        let (port_saver, port) = port_saver::create_pair();
        let figment = rocket::Config::figment()
            .merge(("address", configuration.application.host))
            .merge(("port", configuration.application.port.unwrap_or(0)))
            .merge((
                "databases.tracker",
                configuration.database.pool_config(),
            ));

        let delivery = Delivery::new(
            email_client,
            MailComposer::new(&configuration.email_client.template_dir),
            configuration.application.base_url.clone(),
        );

        let server = rocket::custom(figment)
            .attach(TrackerDbConn::fairing())
            .attach(AdHoc::try_on_ignite("Tracking schema", run_migrations))
            .attach(AdHoc::on_shutdown("Tracking shutdown", |_| {
                Box::pin(async {
                    tracing::info!("Shutting down, releasing the database pool.");
                })
            }))
            .attach(port_saver)
            .manage(delivery)
            .manage(configuration.database.query_timeout())
            .manage(configuration.application.api_credentials())
            .manage(TrackingPixel::from_settings(&configuration.tracking))
            .mount("/", routes![health, track_open, send_email])
            .register(
                "/",
                catchers![
                    unprocessable_entity_to_bad_request,
                    unauthorized_request_credentials
                ],
            )
            .ignite()
            .await
            // Displaying a rocket::Error marks it as handled.
            .map_err(|e| anyhow!("Failed to ignite the server: {}", e))?;

        Ok(Application { server, port })
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> Result<Rocket<Build>, Rocket<Build>> {
    let conn = match TrackerDbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            tracing::error!("No database connection available to run migrations.");
            return Err(rocket);
        }
    };
    let outcome = conn
        .run(|c| {
            c.run_pending_migrations(MIGRATIONS)
                .map(|applied| applied.len())
                .map_err(|e| e.to_string())
        })
        .await;
    match outcome {
        Ok(applied) => {
            tracing::info!(applied, "Tracking schema is up to date.");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!("Failed to run migrations: {}", e);
            Err(rocket)
        }
    }
}
