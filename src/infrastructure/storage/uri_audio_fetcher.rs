use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AudioFetcher, AudioStore, AudioStoreError, LOCAL_URI_SCHEME};
use crate::domain::StoragePath;

/// Resolves `local://` URIs through the audio store and downloads
/// `http(s)://` URIs directly.
pub struct UriAudioFetcher {
    store: Arc<dyn AudioStore>,
    client: reqwest::Client,
}

impl UriAudioFetcher {
    pub fn new(store: Arc<dyn AudioStore>, timeout: Duration) -> Result<Self, AudioStoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AudioStoreError::DownloadFailed(format!("client: {}", e)))?;
        Ok(Self { store, client })
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, AudioStoreError> {
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| AudioStoreError::DownloadFailed(format!("request: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AudioStoreError::NotFound(uri.to_string()));
        }
        if !response.status().is_success() {
            return Err(AudioStoreError::DownloadFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AudioStoreError::DownloadFailed(format!("body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl AudioFetcher for UriAudioFetcher {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, AudioStoreError> {
        if let Some(path) = uri.strip_prefix(LOCAL_URI_SCHEME) {
            return self.store.fetch(&StoragePath::from_raw(path)).await;
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return self.download(uri).await;
        }
        Err(AudioStoreError::UnsupportedUri(uri.to_string()))
    }
}
