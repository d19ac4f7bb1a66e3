//! Azure Blob Storage upload through a shared access signature

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::path::Path;

use super::store::{BlobStore, UploadError};

const API_VERSION: &str = "2021-08-06";

/// Access information for one container
#[derive(Clone)]
pub struct AzureSettings {
    pub account_name: String,
    pub container: String,
    pub sas_token: String,
    /// Blob service root, defaults to `https://<account>.blob.core.windows.net`
    pub endpoint: Option<String>,
}

impl AzureSettings {
    /// `None` unless account, container and SAS token are all set and non-empty
    pub fn from_parts(
        account_name: Option<String>,
        container: Option<String>,
        sas_token: Option<String>,
        endpoint: Option<String>,
    ) -> Option<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            account_name: non_empty(account_name)?,
            container: non_empty(container)?,
            sas_token: non_empty(sas_token)?,
            endpoint: non_empty(endpoint),
        })
    }

    pub fn account_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", self.account_name),
        }
    }
}

impl std::fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSettings")
            .field("account_name", &self.account_name)
            .field("container", &self.container)
            .field("sas_token", &"***")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Block blob upload. Blobs are created only if absent; an existing blob
/// with the same name makes the upload fail with
/// [`UploadError::AlreadyExists`].
pub struct AzureBlobStore {
    http_client: reqwest::Client,
    container_url: String,
    sas_query: String,
}

impl AzureBlobStore {
    pub fn new(settings: &AzureSettings) -> Result<Self, UploadError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| UploadError::Request(e.to_string()))?;

        Ok(Self {
            http_client,
            container_url: format!("{}/{}", settings.account_url(), settings.container),
            sas_query: settings.sas_token.trim_start_matches('?').to_string(),
        })
    }

    fn blob_url(&self, blob_name: &str) -> String {
        format!("{}/{}?{}", self.container_url, blob_name, self.sas_query)
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    fn name(&self) -> &str {
        "Azure Blob Storage"
    }

    async fn upload(&self, object_name: &str, local_path: &Path) -> Result<(), UploadError> {
        let body = tokio::fs::read(local_path).await?;

        let response = self
            .http_client
            .put(self.blob_url(object_name))
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-version", API_VERSION)
            .header("If-None-Match", "*")
            .header(CONTENT_TYPE, "text/csv")
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(UploadError::AlreadyExists(object_name.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(container_url = %self.container_url, blob = %object_name, "Blob written");
        Ok(())
    }
}
