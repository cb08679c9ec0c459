use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use call_quality::application::ports::{
    AudioStore, CallRepository, ChecklistProvider, ChecklistRepository,
};
use call_quality::application::services::{AnalysisPipeline, CallAnalysisEngine, CallIntakeService};
use call_quality::infrastructure::audio::OpenAiWhisperEngine;
use call_quality::infrastructure::llm::OpenAiClient;
use call_quality::infrastructure::observability::{TracingConfig, init_tracing};
use call_quality::infrastructure::persistence::{
    InMemoryRepository, PgCallRepository, PgChecklistRepository, create_pool, run_migrations,
};
use call_quality::infrastructure::storage::{LocalAudioStore, UriAudioFetcher};
use call_quality::presentation::{AppState, Environment, Settings, create_router};

struct Repositories {
    calls: Arc<dyn CallRepository>,
    checklist: Arc<dyn ChecklistRepository>,
    criteria: Arc<dyn ChecklistProvider>,
}

async fn build_repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    if settings.database.url.is_empty() {
        tracing::warn!("database.url is empty, using in-memory repositories");
        let repository = Arc::new(InMemoryRepository::new());
        return Ok(Repositories {
            calls: repository.clone(),
            checklist: repository.clone(),
            criteria: repository,
        });
    }

    let pool = create_pool(&settings.database.url, settings.database.max_connections)
        .await
        .context("Failed to connect to PostgreSQL")?;

    if settings.database.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let checklist = Arc::new(PgChecklistRepository::new(pool.clone()));
    Ok(Repositories {
        calls: Arc::new(PgCallRepository::new(pool)),
        checklist: checklist.clone(),
        criteria: checklist,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging))
        .context("Failed to install tracing subscriber")?;
    tracing::info!(
        environment = %environment,
        model = %settings.llm.model,
        transcription_model = %settings.transcription.model,
        require_full_coverage = settings.analysis.require_full_coverage,
        "Starting call quality service"
    );

    if settings.llm.api_key.is_empty() || settings.transcription.api_key.is_empty() {
        tracing::warn!("Provider API keys are not configured, analysis runs will fail");
    }

    let repositories = build_repositories(&settings).await?;

    let audio_store: Arc<dyn AudioStore> = Arc::new(
        LocalAudioStore::new(PathBuf::from(&settings.storage.local_path))
            .context("Failed to prepare audio storage")?,
    );
    let audio_fetcher = Arc::new(
        UriAudioFetcher::new(
            Arc::clone(&audio_store),
            Duration::from_secs(settings.storage.download_timeout_secs),
        )
        .context("Failed to build audio fetcher")?,
    );

    let transcription_engine = Arc::new(
        OpenAiWhisperEngine::new(
            settings.transcription.api_key.clone(),
            settings.transcription.base_url.clone(),
            Some(settings.transcription.model.clone()),
            Some(settings.transcription.language.clone()),
            Duration::from_secs(settings.transcription.timeout_secs),
        )
        .context("Failed to build transcription client")?,
    );

    let llm_client = Arc::new(
        OpenAiClient::new(
            settings.llm.api_key.clone(),
            settings.llm.base_url.clone(),
            Some(settings.llm.model.clone()),
            settings.llm.temperature,
            Duration::from_secs(settings.llm.timeout_secs),
        )
        .context("Failed to build LLM client")?,
    );

    let analysis_engine = Arc::new(CallAnalysisEngine::new(
        llm_client,
        settings.analysis.require_full_coverage,
    ));

    let analysis_pipeline = Arc::new(AnalysisPipeline::new(
        Arc::clone(&repositories.calls),
        repositories.criteria,
        audio_fetcher,
        transcription_engine,
        analysis_engine,
    ));

    let intake_service = Arc::new(CallIntakeService::new(
        audio_store,
        Arc::clone(&repositories.calls),
        settings.storage.max_file_size_bytes(),
    ));

    let state = AppState {
        analysis_pipeline,
        intake_service,
        call_repository: repositories.calls,
        checklist_repository: repositories.checklist,
        analysis_deadline: Duration::from_secs(settings.analysis.deadline_secs),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
