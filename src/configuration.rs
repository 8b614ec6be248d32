use crate::domain::TrackedEmail;
use crate::guards::ApiCredentials;
use crate::store::QueryTimeout;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    #[serde(default)]
    pub tracking: TrackingSettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    pub host: IpAddr,
    /// Public address the tracking pixel URLs are built from.
    pub base_url: String,
    pub api_username: String,
    pub api_password: Secret<String>,
}

#[derive(serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pool_size: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub acquire_timeout_seconds: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub query_timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// TLS from the first byte, usually on port 465.
    Tls,
    StartTls,
    /// Plain text, for local relays only.
    None,
}

#[derive(serde::Deserialize)]
pub struct EmailClientSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub sender_email: String,
    pub tls: SmtpTls,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub template_dir: PathBuf,
}

#[derive(serde::Deserialize, Default)]
pub struct TrackingSettings {
    /// Image served by `/track`; the embedded 1x1 GIF when unset.
    pub pixel_path: Option<PathBuf>,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<TrackedEmail, String> {
        TrackedEmail::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl ApplicationSettings {
    pub fn api_credentials(&self) -> ApiCredentials {
        ApiCredentials::new(self.api_username.clone(), self.api_password.clone())
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name,
            ssl_mode(self.require_ssl)
        )
    }

    pub fn connection_string_without_database(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            ssl_mode(self.require_ssl)
        )
    }

    /// Settings for the `tracker` pool created by `rocket_sync_db_pools`.
    pub fn pool_config(&self) -> rocket_sync_db_pools::Config {
        rocket_sync_db_pools::Config {
            url: self.connection_string(),
            pool_size: self.pool_size,
            timeout: self.acquire_timeout_seconds,
        }
    }

    pub fn query_timeout(&self) -> QueryTimeout {
        QueryTimeout(Duration::from_millis(self.query_timeout_milliseconds))
    }
}

fn ssl_mode(require_ssl: bool) -> &'static str {
    match require_ssl {
        true => "require",
        false => "prefer",
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!(
            "Failed to determine the current directory: {}",
            e
        ))
    })?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;
    settings.try_into()
}
