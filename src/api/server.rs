use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_vegetation_alerts, get_weather_alerts, health_check, list_block_codes,
    list_weather_types, AppState,
};
use crate::alerts::AlertProcessor;
use crate::config::AppConfig;
use crate::export::{AzureBlobStore, BlobStore, Exporter, S3Store};
use crate::source::AgriquestClient;

pub const S3_TARGET: &str = "aws-s3";
pub const AZURE_TARGET: &str = "azure-blob";

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Alerts
        .route(
            "/regional-level-alerts/get_weather_alerts",
            post(get_weather_alerts),
        )
        .route(
            "/regional-level-alerts/get_vegetation_alerts",
            post(get_vegetation_alerts),
        )
        // Code lists
        .route("/regional-level-alerts/block_codes", get(list_block_codes))
        .route("/regional-level-alerts/weather_types", get(list_weather_types))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Build the exporter with store A (S3) then store B (Azure)
pub async fn build_exporter(config: &AppConfig) -> Result<Exporter, Box<dyn std::error::Error>> {
    let s3_store: Option<Arc<dyn BlobStore>> = match &config.s3 {
        Some(settings) => {
            tracing::info!(bucket = %settings.bucket, region = %settings.region, "AWS S3 upload enabled");
            Some(Arc::new(S3Store::connect(settings).await))
        }
        None => {
            tracing::warn!("AWS S3 upload disabled: AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and AWS_BUCKET_NAME are required");
            None
        }
    };

    let azure_store: Option<Arc<dyn BlobStore>> = match &config.azure {
        Some(settings) => {
            tracing::info!(account = %settings.account_name, container = %settings.container, "Azure Blob Storage upload enabled");
            Some(Arc::new(AzureBlobStore::new(settings)?))
        }
        None => {
            tracing::warn!("Azure Blob Storage upload disabled: AZURE_ACCOUNT_NAME, AZURE_BLOB_CONTAINER_NAME and AZURE_SAS_CREDENTIAL are required");
            None
        }
    };

    Ok(Exporter::new(&config.scratch_dir)
        .with_target(S3_TARGET, s3_store)
        .with_target(AZURE_TARGET, azure_store))
}

/// Run the HTTP server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "Provider credentials incomplete, alert requests will fail to authenticate");
    }

    let source = Arc::new(AgriquestClient::new(&config.provider)?);
    tracing::info!(api_root = %source.api_root(), "Provider client ready");

    let state = Arc::new(AppState {
        processor: AlertProcessor::new(source),
        exporter: build_exporter(&config).await?,
    });

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting regional level alerts server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Regional level alerts server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for CTRL+C");
        return;
    }
    tracing::info!("Shutdown signal received");
}
