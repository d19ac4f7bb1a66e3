use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::alerts::{
    AlertError, AlertKind, AlertProcessor, AlertResult, VegetationAlertQuery, WeatherAlertQuery,
};
use crate::export::{ExportedFile, Exporter};
use crate::source::{BlockCode, WeatherType};

/// Application state shared across handlers
pub struct AppState {
    pub processor: AlertProcessor,
    pub exporter: Exporter,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Code Lists
// ============================================================================

#[derive(Serialize)]
pub struct CodesResponse {
    pub codes: Vec<CodeInfo>,
}

#[derive(Serialize)]
pub struct CodeInfo {
    pub code: &'static str,
    pub id: u32,
}

pub async fn list_block_codes() -> Json<CodesResponse> {
    let codes = BlockCode::ALL
        .iter()
        .map(|c| CodeInfo {
            code: c.wire_name(),
            id: c.id(),
        })
        .collect();
    Json(CodesResponse { codes })
}

pub async fn list_weather_types() -> Json<CodesResponse> {
    let codes = WeatherType::ALL
        .iter()
        .map(|c| CodeInfo {
            code: c.wire_name(),
            id: c.id(),
        })
        .collect();
    Json(CodesResponse { codes })
}

// ============================================================================
// Weather Alerts
// ============================================================================

/// Body of the weather alerts request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlertParameters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub threshold: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlertOptions {
    pub block_code: BlockCode,
    pub weather_type: WeatherType,
    pub operator: String,
}

pub async fn get_weather_alerts(
    State(state): State<Arc<AppState>>,
    Query(options): Query<WeatherAlertOptions>,
    Json(item): Json<WeatherAlertParameters>,
) -> Result<Response, ApiError> {
    let kind = AlertKind::Weather;
    tracing::info!(
        block_code = %options.block_code,
        start_date = %item.start_date,
        end_date = %item.end_date,
        weather_type = %options.weather_type,
        threshold = item.threshold,
        operator = %options.operator,
        "{}",
        kind.endpoint()
    );

    let query = WeatherAlertQuery {
        block: options.block_code,
        start_date: item.start_date,
        end_date: item.end_date,
        weather_type: options.weather_type,
        threshold: item.threshold,
        operator: options.operator,
    };

    let result = state
        .processor
        .weather_alerts(&query)
        .await
        .map_err(|e| ApiError::from_alert(kind, e))?;

    respond_with_alerts(&state.exporter, kind, result).await
}

// ============================================================================
// Vegetation Alerts
// ============================================================================

/// Body of the vegetation alerts request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationAlertParameters {
    pub observation_date: NaiveDate,
    pub threshold: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationAlertOptions {
    pub block_code: BlockCode,
    pub operator: String,
}

pub async fn get_vegetation_alerts(
    State(state): State<Arc<AppState>>,
    Query(options): Query<VegetationAlertOptions>,
    Json(item): Json<VegetationAlertParameters>,
) -> Result<Response, ApiError> {
    let kind = AlertKind::Vegetation;
    tracing::info!(
        block_code = %options.block_code,
        observation_date = %item.observation_date,
        threshold = item.threshold,
        operator = %options.operator,
        "{}",
        kind.endpoint()
    );

    let query = VegetationAlertQuery {
        block: options.block_code,
        observation_date: item.observation_date,
        threshold: item.threshold,
        operator: options.operator,
    };

    let result = state
        .processor
        .vegetation_alerts(&query)
        .await
        .map_err(|e| ApiError::from_alert(kind, e))?;

    respond_with_alerts(&state.exporter, kind, result).await
}

// ============================================================================
// Responses
// ============================================================================

/// Export the regions in alert and send the CSV back, or the no-data message
async fn respond_with_alerts(
    exporter: &Exporter,
    kind: AlertKind,
    result: Option<AlertResult>,
) -> Result<Response, ApiError> {
    let Some(result) = result else {
        tracing::info!("{}", kind.no_data_message());
        return Ok(no_data_response(kind));
    };

    let exported = exporter
        .export(&result.table, kind.file_suffix())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    file_response(&exported).await
}

fn no_data_response(kind: AlertKind) -> Response {
    let body = serde_json::Value::String(kind.no_data_message()).to_string();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response()
}

async fn file_response(exported: &ExportedFile) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(&exported.path)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn from_alert(kind: AlertKind, err: AlertError) -> Self {
        match err {
            AlertError::InvalidOperator(_) => {
                ApiError::BadRequest(format!("{}: {}", kind.endpoint(), err))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "detail": message
        });

        (status, Json(body)).into_response()
    }
}
