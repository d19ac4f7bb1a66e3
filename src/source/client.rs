//! AgriQuest API client
//!
//! Authenticates against the provider identity server with an OAuth2
//! password grant and reads block data as CSV.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::codes::{BlockCode, CommodityCode, WeatherType};
use super::{DataSource, FetchOutcome, SourceError};
use crate::data::Table;

const TOKEN_PATH: &str = "/v2.1/connect/token";
const WEATHER_PATH: &str = "/weather-block-data";
const NDVI_PATH: &str = "/ndvi-block-data";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Provider deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderEnv {
    #[default]
    Prod,
    Preprod,
}

impl FromStr for ProviderEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prod" => Ok(ProviderEnv::Prod),
            "preprod" => Ok(ProviderEnv::Preprod),
            other => Err(format!("unknown provider env '{}', expected prod or preprod", other)),
        }
    }
}

/// Provider geographic region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderRegion {
    #[default]
    Na,
    Eu,
}

impl FromStr for ProviderRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "na" => Ok(ProviderRegion::Na),
            "eu" => Ok(ProviderRegion::Eu),
            other => Err(format!("unknown provider region '{}', expected na or eu", other)),
        }
    }
}

/// Provider task queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityQueue {
    #[default]
    Realtime,
    Bulk,
}

impl FromStr for PriorityQueue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "realtime" => Ok(PriorityQueue::Realtime),
            "bulk" => Ok(PriorityQueue::Bulk),
            other => Err(format!("unknown priority queue '{}', expected realtime or bulk", other)),
        }
    }
}

/// API user credentials
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Client configuration, resolved once at startup
#[derive(Debug, Clone, Default)]
pub struct AgriquestConfig {
    pub credentials: Credentials,
    pub env: ProviderEnv,
    pub region: ProviderRegion,
    pub priority_queue: PriorityQueue,
    /// Identity server root, overrides the env/region default
    pub identity_url: Option<String>,
    /// Block data API root, overrides the env/region default
    pub base_url: Option<String>,
}

impl AgriquestConfig {
    pub fn identity_root(&self) -> String {
        if let Some(url) = &self.identity_url {
            return url.trim_end_matches('/').to_string();
        }
        match (self.env, self.region) {
            (ProviderEnv::Prod, ProviderRegion::Na) => "https://identity.geosys-na.com",
            (ProviderEnv::Preprod, ProviderRegion::Na) => "https://identity.preprod.geosys-na.com",
            (ProviderEnv::Prod, ProviderRegion::Eu) => "https://identity.geosys-eu.com",
            (ProviderEnv::Preprod, ProviderRegion::Eu) => "https://identity.preprod.geosys-eu.com",
        }
        .to_string()
    }

    pub fn api_root(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        let host = match (self.env, self.region) {
            (ProviderEnv::Prod, ProviderRegion::Na) => "https://api.geosys-na.net",
            (ProviderEnv::Preprod, ProviderRegion::Na) => "https://api-pp.geosys-na.net",
            (ProviderEnv::Prod, ProviderRegion::Eu) => "https://api.geosys-eu.net",
            (ProviderEnv::Preprod, ProviderRegion::Eu) => "https://api-pp.geosys-eu.net",
        };
        format!("{}/Agriquest/Geosys.Agriquest.CropMonitoring.WebApi/v0/api", host)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherBlockRequest {
    block_id: u32,
    start_date: String,
    end_date: String,
    weather_type_id: u32,
    priority_queue: PriorityQueue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NdviBlockRequest {
    block_id: u32,
    observation_date: String,
    commodity_code: u32,
    priority_queue: PriorityQueue,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Data source backed by the AgriQuest API
#[derive(Debug, Clone)]
pub struct AgriquestClient {
    http_client: reqwest::Client,
    credentials: Credentials,
    priority_queue: PriorityQueue,
    token_url: String,
    api_root: String,
}

impl AgriquestClient {
    pub fn new(config: &AgriquestConfig) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            credentials: config.credentials.clone(),
            priority_queue: config.priority_queue,
            token_url: format!("{}{}", config.identity_root(), TOKEN_PATH),
            api_root: config.api_root(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Request an access token with the password grant
    async fn access_token(&self) -> Result<String, SourceError> {
        let params = [
            ("grant_type", "password"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("scope", "openid offline_access"),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!(
                "identity server returned {}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("invalid token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// POST a block data request and decode the CSV answer
    async fn fetch_block_data<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<FetchOutcome, SourceError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.api_root, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .header(ACCEPT, "text/csv")
            .json(body)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            tracing::info!(url = %url, status = %status, "Provider has no data");
            return Ok(FetchOutcome::NoData);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(FetchOutcome::NoData);
        }

        let table = Table::from_csv_str(&body)?;
        if table.is_empty() {
            return Ok(FetchOutcome::NoData);
        }

        tracing::debug!(url = %url, rows = table.len(), "Provider data received");
        Ok(FetchOutcome::Data(table))
    }
}

#[async_trait]
impl DataSource for AgriquestClient {
    async fn fetch_weather(
        &self,
        block: BlockCode,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weather_type: WeatherType,
    ) -> Result<FetchOutcome, SourceError> {
        let request = WeatherBlockRequest {
            block_id: block.id(),
            start_date: start_date.format(DATE_FORMAT).to_string(),
            end_date: end_date.format(DATE_FORMAT).to_string(),
            weather_type_id: weather_type.id(),
            priority_queue: self.priority_queue,
        };
        self.fetch_block_data(WEATHER_PATH, &request).await
    }

    async fn fetch_vegetation(
        &self,
        block: BlockCode,
        observation_date: NaiveDate,
    ) -> Result<FetchOutcome, SourceError> {
        let request = NdviBlockRequest {
            block_id: block.id(),
            observation_date: observation_date.format(DATE_FORMAT).to_string(),
            commodity_code: CommodityCode::AllVegetation.id(),
            priority_queue: self.priority_queue,
        };
        self.fetch_block_data(NDVI_PATH, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::post,
        Form, Json, Router,
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct MockProvider {
        weather_csv: String,
        ndvi_status: u16,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    async fn token(Form(params): Form<HashMap<String, String>>) -> impl IntoResponse {
        if params.get("grant_type").map(String::as_str) != Some("password")
            || params.get("password").map(String::as_str) != Some("secret-pw")
        {
            return (AxumStatus::UNAUTHORIZED, "invalid_grant").into_response();
        }
        Json(serde_json::json!({ "access_token": "tok-123", "expires_in": 3600 })).into_response()
    }

    async fn weather(
        State(mock): State<Arc<MockProvider>>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> impl IntoResponse {
        if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer tok-123") {
            return (AxumStatus::UNAUTHORIZED, String::new());
        }
        mock.requests.lock().unwrap().push(body);
        (AxumStatus::OK, mock.weather_csv.clone())
    }

    async fn ndvi(
        State(mock): State<Arc<MockProvider>>,
        Json(body): Json<serde_json::Value>,
    ) -> impl IntoResponse {
        mock.requests.lock().unwrap().push(body);
        let status = AxumStatus::from_u16(mock.ndvi_status).unwrap_or(AxumStatus::OK);
        (status, "AMU,NDVI\n")
    }

    async fn spawn_provider(mock: Arc<MockProvider>) -> String {
        let app = Router::new()
            .route(TOKEN_PATH, post(token))
            .route(WEATHER_PATH, post(weather))
            .route(NDVI_PATH, post(ndvi))
            .with_state(mock);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config_for(root: &str, password: &str) -> AgriquestConfig {
        AgriquestConfig {
            credentials: Credentials {
                client_id: "id".to_string(),
                client_secret: "client-secret".to_string(),
                username: "user".to_string(),
                password: password.to_string(),
            },
            identity_url: Some(root.to_string()),
            base_url: Some(format!("{}/", root)),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_endpoints() {
        let config = AgriquestConfig::default();
        assert_eq!(config.identity_root(), "https://identity.geosys-na.com");
        assert!(config.api_root().starts_with("https://api.geosys-na.net/"));

        let config = AgriquestConfig {
            env: ProviderEnv::Preprod,
            region: ProviderRegion::Eu,
            ..Default::default()
        };
        assert_eq!(config.identity_root(), "https://identity.preprod.geosys-eu.com");
        assert!(config.api_root().starts_with("https://api-pp.geosys-eu.net/"));
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("PREPROD".parse::<ProviderEnv>().unwrap(), ProviderEnv::Preprod);
        assert_eq!("eu".parse::<ProviderRegion>().unwrap(), ProviderRegion::Eu);
        assert_eq!("bulk".parse::<PriorityQueue>().unwrap(), PriorityQueue::Bulk);
        assert!("staging".parse::<ProviderEnv>().is_err());
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let credentials = Credentials {
            client_secret: "s3cr3t".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_fetch_weather() {
        let mock = Arc::new(MockProvider {
            weather_csv: "AMU,Date,Value_mm\n31,2023-06-01,10.2\n32,2023-06-01,5.0\n".to_string(),
            ..Default::default()
        });
        let root = spawn_provider(Arc::clone(&mock)).await;
        let client = AgriquestClient::new(&config_for(&root, "secret-pw")).unwrap();
        assert_eq!(client.api_root(), root);

        let outcome = client
            .fetch_weather(
                BlockCode::FraDepartements,
                NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
                WeatherType::CumulativePrecipitation,
            )
            .await
            .unwrap();

        let table = outcome.into_table().unwrap();
        assert_eq!(table.columns(), &["AMU", "Date", "Value_mm"]);
        assert_eq!(table.rows()[0][2], Value::Float64(10.2));

        let requests = mock.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            serde_json::json!({
                "blockId": 25,
                "startDate": "2023-06-01",
                "endDate": "2023-06-30",
                "weatherTypeId": 2,
                "priorityQueue": "realtime"
            })
        );
    }

    #[tokio::test]
    async fn test_vegetation_header_only_is_no_data() {
        let mock = Arc::new(MockProvider {
            ndvi_status: 200,
            ..Default::default()
        });
        let root = spawn_provider(Arc::clone(&mock)).await;
        let client = AgriquestClient::new(&config_for(&root, "secret-pw")).unwrap();

        let outcome = client
            .fetch_vegetation(
                BlockCode::UsaStates,
                NaiveDate::from_ymd_opt(2023, 7, 14).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::NoData);

        let requests = mock.requests.lock().unwrap();
        assert_eq!(requests[0]["commodityCode"], 33);
        assert_eq!(requests[0]["observationDate"], "2023-07-14");
    }

    #[tokio::test]
    async fn test_vegetation_not_found_is_no_data() {
        let mock = Arc::new(MockProvider {
            ndvi_status: 404,
            ..Default::default()
        });
        let root = spawn_provider(mock).await;
        let client = AgriquestClient::new(&config_for(&root, "secret-pw")).unwrap();

        let outcome = client
            .fetch_vegetation(BlockCode::UsaStates, NaiveDate::from_ymd_opt(2023, 7, 14).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::NoData);
    }

    #[tokio::test]
    async fn test_provider_error_status() {
        let mock = Arc::new(MockProvider {
            ndvi_status: 503,
            ..Default::default()
        });
        let root = spawn_provider(mock).await;
        let client = AgriquestClient::new(&config_for(&root, "secret-pw")).unwrap();

        let err = client
            .fetch_vegetation(BlockCode::UsaStates, NaiveDate::from_ymd_opt(2023, 7, 14).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Remote { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let mock = Arc::new(MockProvider::default());
        let root = spawn_provider(mock).await;
        let client = AgriquestClient::new(&config_for(&root, "wrong")).unwrap();

        let err = client
            .fetch_vegetation(BlockCode::UsaStates, NaiveDate::from_ymd_opt(2023, 7, 14).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Auth(_)));
    }
}
