mod audio_store;
mod call_repository;
mod checklist_repository;
mod llm_client;
mod repository_error;
mod transcription_engine;

pub use audio_store::{AudioFetcher, AudioStore, AudioStoreError, LOCAL_URI_SCHEME};
pub use call_repository::{CallRepository, StatusUpdate};
pub use checklist_repository::{ChecklistProvider, ChecklistRepository};
pub use llm_client::{LlmClient, LlmClientError};
pub use repository_error::RepositoryError;
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
