//! Process configuration
//!
//! Read once at startup from the environment and handed to the
//! constructors of the provider client and the exporter.

use std::path::PathBuf;

use crate::export::{AzureSettings, S3Settings};
use crate::source::{AgriquestConfig, Credentials};

/// Full service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory receiving exported CSV files
    pub scratch_dir: PathBuf,
    pub provider: AgriquestConfig,
    /// Object store A, `None` when access information is incomplete
    pub s3: Option<S3Settings>,
    /// Object store B, `None` when access information is incomplete
    pub azure: Option<AzureSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            scratch_dir: std::env::temp_dir(),
            provider: AgriquestConfig::default(),
            s3: None,
            azure: None,
        }
    }
}

impl AppConfig {
    /// Build from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("RLA_PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "RLA_PORT",
                message: format!("'{}' is not a port number", p),
            })?,
            None => defaults.port,
        };

        let provider = AgriquestConfig {
            credentials: Credentials {
                client_id: var("API_CLIENT_ID").unwrap_or_default(),
                client_secret: var("API_CLIENT_SECRET").unwrap_or_default(),
                username: var("API_USERNAME").unwrap_or_default(),
                password: var("API_PASSWORD").unwrap_or_default(),
            },
            env: parse_or_default(var("API_ENV"), "API_ENV")?,
            region: parse_or_default(var("API_REGION"), "API_REGION")?,
            priority_queue: parse_or_default(var("API_PRIORITY_QUEUE"), "API_PRIORITY_QUEUE")?,
            identity_url: var("API_IDENTITY_URL"),
            base_url: var("API_BASE_URL"),
        };

        Ok(Self {
            host: var("RLA_HOST").unwrap_or(defaults.host),
            port,
            scratch_dir: var("RLA_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            provider,
            s3: S3Settings::from_parts(
                var("AWS_ACCESS_KEY_ID"),
                var("AWS_SECRET_ACCESS_KEY"),
                var("AWS_BUCKET_NAME"),
                var("AWS_REGION"),
                var("AWS_ENDPOINT_URL"),
            ),
            azure: AzureSettings::from_parts(
                var("AZURE_ACCOUNT_NAME"),
                var("AZURE_BLOB_CONTAINER_NAME"),
                var("AZURE_SAS_CREDENTIAL"),
                var("AZURE_BLOB_ENDPOINT"),
            ),
        })
    }

    /// Provider credentials that are still empty
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let credentials = &self.provider.credentials;
        [
            ("API_CLIENT_ID", &credentials.client_id),
            ("API_CLIENT_SECRET", &credentials.client_secret),
            ("API_USERNAME", &credentials.username),
            ("API_PASSWORD", &credentials.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

fn parse_or_default<T>(value: Option<String>, key: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|message| ConfigError::Invalid { key, message }),
        None => Ok(T::default()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
