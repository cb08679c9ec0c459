use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use crate::application::ports::{AudioStore, AudioStoreError, CallRepository, RepositoryError};
use crate::domain::{AudioFormat, Call, StoragePath, UserId};

pub struct AudioUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub manager_id: UserId,
    pub client_id: Option<UserId>,
}

/// Accepts uploaded recordings: checks format and size, stores the bytes and
/// registers a `pending` call pointing at them.
pub struct CallIntakeService {
    audio_store: Arc<dyn AudioStore>,
    call_repository: Arc<dyn CallRepository>,
    max_file_size_bytes: usize,
}

impl CallIntakeService {
    pub fn new(
        audio_store: Arc<dyn AudioStore>,
        call_repository: Arc<dyn CallRepository>,
        max_file_size_bytes: usize,
    ) -> Self {
        Self {
            audio_store,
            call_repository,
            max_file_size_bytes,
        }
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    #[tracing::instrument(skip(self, upload), fields(filename = %upload.filename, bytes = upload.data.len()))]
    pub async fn accept(&self, upload: AudioUpload) -> Result<Call, IntakeError> {
        let safe_name = StoragePath::sanitize_filename(&upload.filename);
        let format = upload
            .content_type
            .as_deref()
            .and_then(AudioFormat::from_mime)
            .or_else(|| AudioFormat::from_filename(&safe_name))
            .ok_or_else(|| {
                IntakeError::UnsupportedFormat(
                    upload
                        .content_type
                        .clone()
                        .unwrap_or_else(|| upload.filename.clone()),
                )
            })?;

        if upload.data.is_empty() {
            return Err(IntakeError::EmptyFile);
        }
        if upload.data.len() > self.max_file_size_bytes {
            return Err(IntakeError::TooLarge {
                size: upload.data.len(),
                limit: self.max_file_size_bytes,
            });
        }

        let filename = if AudioFormat::from_filename(&safe_name).is_some() {
            safe_name
        } else {
            format!("{}.{}", safe_name, format.extension())
        };

        let path = StoragePath::for_upload(&upload.manager_id, Utc::now(), &filename);
        let audio_url = self
            .audio_store
            .store(&path, upload.data)
            .await
            .map_err(IntakeError::Storage)?;

        let call = Call::new(upload.manager_id, upload.client_id, audio_url);

        if let Err(e) = self.call_repository.create(&call).await {
            if let Err(del_err) = self.audio_store.delete(&path).await {
                tracing::warn!(
                    error = %del_err,
                    path = %path,
                    "Failed to delete stored audio after call creation failure"
                );
            }
            return Err(IntakeError::Repository(e));
        }

        tracing::info!(
            call_id = %call.id,
            manager_id = %call.manager_id,
            format = format.extension(),
            "Call recording accepted"
        );

        Ok(call)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("audio file is empty")]
    EmptyFile,
    #[error("audio file of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("storage: {0}")]
    Storage(AudioStoreError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
}
