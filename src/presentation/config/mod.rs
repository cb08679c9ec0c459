mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment, UnknownEnvironment};
pub use settings::{
    AnalysisSettings, DatabaseSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
    StorageSettings, TranscriptionSettings,
};
