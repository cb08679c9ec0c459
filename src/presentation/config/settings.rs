use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub storage: StorageSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Empty selects the in-memory repositories.
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub language: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub local_path: String,
    pub max_file_size_mb: usize,
    pub download_timeout_secs: u64,
}

impl StorageSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// How long the trigger endpoint waits for a run before answering.
    pub deadline_secs: u64,
    /// Reject model verdicts that skip any supplied criterion.
    pub require_full_coverage: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{environment}.toml` and
    /// `APP__SECTION__KEY` environment variables, in increasing priority.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let file_name = environment.settings_file();

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.run_migrations", true)?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "llama-3.3-70b-versatile")?
            .set_default("llm.temperature", 0.2)?
            .set_default("llm.timeout_secs", 45)?
            .set_default("transcription.api_key", "")?
            .set_default("transcription.model", "whisper-large-v3")?
            .set_default("transcription.language", "ru")?
            .set_default("transcription.timeout_secs", 45)?
            .set_default("storage.local_path", "./data/audio")?
            .set_default("storage.max_file_size_mb", 25)?
            .set_default("storage.download_timeout_secs", 30)?
            .set_default("analysis.deadline_secs", 60)?
            .set_default("analysis.require_full_coverage", true)?
            .set_default("logging.level", "info,call_quality=debug,tower_http=debug")?
            .set_default("logging.enable_json", environment.is_prod())?
            .add_source(File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
