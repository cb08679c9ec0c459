use std::io;

use bytes::Bytes;

use crate::domain::StoragePath;

pub const LOCAL_URI_SCHEME: &str = "local://";

/// Durable storage for uploaded recordings.
#[async_trait::async_trait]
pub trait AudioStore: Send + Sync {
    /// Stores `data` at `path` and returns the URI later handed to analysis.
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<String, AudioStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, AudioStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), AudioStoreError>;
}

/// Resolves a stored audio URI to its bytes.
#[async_trait::async_trait]
pub trait AudioFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AudioStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("unsupported uri: {0}")]
    UnsupportedUri(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
