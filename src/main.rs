//! Regional Level Alerts Server
//!
//! Run with: cargo run
//!
//! Environment variables (also read from a `.env` file):
//! - RLA_HOST: Bind address (default: 0.0.0.0)
//! - RLA_PORT: Port number (default: 8080)
//! - RLA_SCRATCH_DIR: Directory for exported CSV files (default: OS temp dir)
//! - API_CLIENT_ID, API_CLIENT_SECRET, API_USERNAME, API_PASSWORD: AgriQuest API credentials
//! - API_ENV: prod | preprod (default: prod)
//! - API_REGION: na | eu (default: na)
//! - API_PRIORITY_QUEUE: realtime | bulk (default: realtime)
//! - AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_BUCKET_NAME, AWS_REGION: S3 upload
//! - AZURE_ACCOUNT_NAME, AZURE_BLOB_CONTAINER_NAME, AZURE_SAS_CREDENTIAL: Azure Blob upload
//! - RUST_LOG: Log level (default: info)

use regional_level_alerts::api::run_server;
use regional_level_alerts::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_result = dotenv::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regional_level_alerts=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv_result {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let config = AppConfig::from_env()?;

    tracing::info!("Regional level alerts configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    tracing::info!("  Scratch directory: {}", config.scratch_dir.display());
    tracing::info!(
        "  Provider: {:?} / {:?}, {:?} queue",
        config.provider.env,
        config.provider.region,
        config.provider.priority_queue
    );
    tracing::info!(
        "  AWS S3 upload: {}",
        if config.s3.is_some() { "enabled" } else { "disabled" }
    );
    tracing::info!(
        "  Azure Blob upload: {}",
        if config.azure.is_some() { "enabled" } else { "disabled" }
    );

    println!(
        r#"
 Regional Level Alerts
 Weather and vegetation threshold alerts on regional entities
 Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );

    run_server(config).await
}
