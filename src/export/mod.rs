//! CSV export of alert results
//!
//! Filtered tables are written to a timestamped CSV file in the scratch
//! directory, then copied to every configured object store. Uploads are
//! best effort: the local file is returned whatever their outcome.

pub mod azure;
pub mod s3;
pub mod store;

use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;

use crate::data::{Table, TableError};

pub use azure::{AzureBlobStore, AzureSettings};
pub use s3::{S3Settings, S3Store};
pub use store::{BlobStore, UploadError};

const FILE_STEM: &str = "regional-level-alerts";

/// Export file name for a timestamp and alert suffix.
///
/// Resolution is one second: two exports with the same suffix in the
/// same second share a name and the later one replaces the earlier file.
pub fn file_name(timestamp: &DateTime<Local>, suffix: &str) -> String {
    format!(
        "{}_{}{}.csv",
        timestamp.format("%Y-%m-%d_%H-%M-%S"),
        FILE_STEM,
        suffix
    )
}

/// Store slot; a slot without a store is skipped
#[derive(Clone)]
pub struct UploadTarget {
    pub name: String,
    pub store: Option<Arc<dyn BlobStore>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub target: String,
    pub outcome: UploadOutcome,
}

/// Local CSV file produced by an export
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub uploads: Vec<UploadReport>,
}

impl ExportedFile {
    pub fn uploaded_to(&self, target: &str) -> bool {
        self.uploads
            .iter()
            .any(|r| r.target == target && r.outcome == UploadOutcome::Uploaded)
    }
}

/// Writes alert tables to CSV and mirrors them to object stores
#[derive(Clone)]
pub struct Exporter {
    scratch_dir: PathBuf,
    targets: Vec<UploadTarget>,
}

impl Exporter {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            targets: Vec::new(),
        }
    }

    /// Add an upload target, attempted after the ones already added
    pub fn with_target(mut self, name: impl Into<String>, store: Option<Arc<dyn BlobStore>>) -> Self {
        self.targets.push(UploadTarget {
            name: name.into(),
            store,
        });
        self
    }

    pub async fn export(&self, table: &Table, suffix: &str) -> Result<ExportedFile, ExportError> {
        self.export_at(table, suffix, Local::now()).await
    }

    /// Export with an explicit timestamp for the file name
    pub async fn export_at(
        &self,
        table: &Table,
        suffix: &str,
        timestamp: DateTime<Local>,
    ) -> Result<ExportedFile, ExportError> {
        let file_name = file_name(&timestamp, suffix);
        let path = self.scratch_dir.join(&file_name);

        tracing::info!(path = %path.display(), rows = table.len(), "Saving alerts to csv file");
        let bytes = table.to_csv_bytes()?;
        tokio::fs::write(&path, bytes).await.map_err(TableError::Io)?;

        let mut uploads = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let outcome = match &target.store {
                None => {
                    tracing::warn!(
                        upload_target = %target.name,
                        "Upload skipped: no valid access information configured"
                    );
                    UploadOutcome::Skipped
                }
                Some(store) => match store.upload(&file_name, &path).await {
                    Ok(()) => {
                        tracing::info!(upload_target = %target.name, store = store.name(), file = %file_name, "File uploaded");
                        UploadOutcome::Uploaded
                    }
                    Err(e) => {
                        tracing::error!(
                            upload_target = %target.name,
                            store = store.name(),
                            error = %e,
                            "Error while uploading file"
                        );
                        UploadOutcome::Failed(e.to_string())
                    }
                },
            };
            uploads.push(UploadReport {
                target: target.name.clone(),
                outcome,
            });
        }

        Ok(ExportedFile {
            path,
            file_name,
            uploads,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Cannot write csv file: {0}")]
    Write(#[from] TableError),
}
