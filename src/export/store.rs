use async_trait::async_trait;
use std::path::Path;

/// Remote object storage receiving exported files
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Upload the local file under `object_name`
    async fn upload(&self, object_name: &str, local_path: &Path) -> Result<(), UploadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Store returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Object already exists: {0}")]
    AlreadyExists(String),
}
