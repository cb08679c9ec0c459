use async_trait::async_trait;

/// Speech-to-text provider. The target language is fixed at construction.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// `filename` is a hint the provider uses to infer the container format.
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
