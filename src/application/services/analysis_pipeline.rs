use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{
    AudioFetcher, AudioStoreError, CallRepository, ChecklistProvider, RepositoryError,
    StatusUpdate, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{
    ANALYSIS_FAILED_SUMMARY, AnalysisStatus, AudioFormat, Call, CallId,
    EMPTY_CHECKLIST_SUMMARY, RunToken, Score, TRANSCRIPTION_FAILED_SUMMARY,
};

use super::{AnalysisEngineError, CallAnalysisEngine};

const FALLBACK_AUDIO_FILENAME: &str = "call.mp3";

/// Drives one call through `transcribing → analyzing → done`, or to `error`
/// with an operator-facing summary on the first failing step.
///
/// Runs are not retried. Re-analysis calls [`AnalysisPipeline::run`] again,
/// which stamps a fresh run token so a slower, older run cannot overwrite
/// the newer one.
pub struct AnalysisPipeline {
    call_repository: Arc<dyn CallRepository>,
    checklist: Arc<dyn ChecklistProvider>,
    audio_fetcher: Arc<dyn AudioFetcher>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    analysis_engine: Arc<CallAnalysisEngine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub call_id: CallId,
    pub score: Score,
    pub summary: String,
    pub criteria_scored: usize,
}

impl AnalysisPipeline {
    pub fn new(
        call_repository: Arc<dyn CallRepository>,
        checklist: Arc<dyn ChecklistProvider>,
        audio_fetcher: Arc<dyn AudioFetcher>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        analysis_engine: Arc<CallAnalysisEngine>,
    ) -> Self {
        Self {
            call_repository,
            checklist,
            audio_fetcher,
            transcription_engine,
            analysis_engine,
        }
    }

    pub async fn run(&self, call_id: CallId) -> Result<AnalysisOutcome, PipelineError> {
        let call = self
            .call_repository
            .get_by_id(call_id)
            .await
            .map_err(PipelineError::Persistence)?
            .ok_or(PipelineError::NotFound(call_id))?;

        let token = RunToken::new();
        let span = tracing::info_span!(
            "call_analysis",
            call_id = %call_id,
            run_token = %token,
            previous_status = %call.status,
        );

        async move {
            self.call_repository
                .begin_run(call_id, token)
                .await
                .map_err(|e| match e {
                    RepositoryError::NotFound(_) => PipelineError::NotFound(call_id),
                    other => PipelineError::Persistence(other),
                })?;
            tracing::debug!(status = %AnalysisStatus::Transcribing, "Call status transition");

            match self.execute(&call, token).await {
                Ok(outcome) => {
                    tracing::info!(
                        score = %outcome.score,
                        criteria_scored = outcome.criteria_scored,
                        "Call analysis completed"
                    );
                    Ok(outcome)
                }
                Err(e) => Err(self.fail(call_id, token, e).await),
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, call: &Call, token: RunToken) -> Result<AnalysisOutcome, PipelineError> {
        let audio = self
            .audio_fetcher
            .fetch(&call.audio_url)
            .await
            .map_err(PipelineError::AudioFetch)?;
        tracing::debug!(bytes = audio.len(), "Audio downloaded");

        let filename = audio_filename(&call.audio_url);
        let transcript = self
            .transcription_engine
            .transcribe(&audio, &filename)
            .await
            .map_err(PipelineError::Transcription)?;

        self.advance(
            call.id,
            token,
            StatusUpdate::to(AnalysisStatus::Analyzing).with_transcript(transcript.clone()),
        )
        .await?;

        let criteria = self
            .checklist
            .active_criteria()
            .await
            .map_err(PipelineError::Checklist)?;

        if criteria.is_empty() {
            return Err(PipelineError::EmptyChecklist);
        }

        let verdict = self
            .analysis_engine
            .analyze(&transcript, &criteria)
            .await
            .map_err(PipelineError::Analysis)?;

        let scores = verdict.to_scores(call.id);
        self.call_repository
            .complete_run(call.id, token, verdict.score, &verdict.summary, &scores)
            .await
            .map_err(|e| stale_or(call.id, e, PipelineError::Persistence))?;
        tracing::debug!(status = %AnalysisStatus::Done, "Call status transition");

        Ok(AnalysisOutcome {
            call_id: call.id,
            score: verdict.score,
            summary: verdict.summary,
            criteria_scored: scores.len(),
        })
    }

    async fn advance(
        &self,
        call_id: CallId,
        token: RunToken,
        update: StatusUpdate,
    ) -> Result<(), PipelineError> {
        let status = update.status;
        self.call_repository
            .update_status(call_id, token, update)
            .await
            .map_err(|e| stale_or(call_id, e, PipelineError::Persistence))?;
        tracing::debug!(status = %status, "Call status transition");
        Ok(())
    }

    /// Marks the call `error` with the failure's fixed summary. Detail stays
    /// in the log. Returns the error to report to the caller.
    async fn fail(&self, call_id: CallId, token: RunToken, error: PipelineError) -> PipelineError {
        let Some(summary) = error.failure_summary() else {
            tracing::warn!(error = %error, "Analysis run abandoned");
            return error;
        };

        tracing::error!(
            error = %error,
            provider_failure = error.is_provider_failure(),
            "Call analysis failed"
        );

        let update = StatusUpdate::to(AnalysisStatus::Error).with_summary(summary);
        match self.call_repository.update_status(call_id, token, update).await {
            Ok(()) => {
                tracing::debug!(status = %AnalysisStatus::Error, "Call status transition");
                error
            }
            Err(RepositoryError::StaleRun(_)) => {
                tracing::warn!("Newer analysis run owns the call, error status not written");
                PipelineError::Superseded(call_id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to record error status");
                error
            }
        }
    }
}

fn stale_or(
    call_id: CallId,
    error: RepositoryError,
    otherwise: fn(RepositoryError) -> PipelineError,
) -> PipelineError {
    match error {
        RepositoryError::StaleRun(_) => PipelineError::Superseded(call_id),
        other => otherwise(other),
    }
}

/// Filename hint for the transcription provider, taken from the URI's last
/// path segment when it carries a known audio extension.
fn audio_filename(uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let last = path.rsplit('/').next().unwrap_or(path);
    match AudioFormat::from_filename(last) {
        Some(_) => last.to_string(),
        None => FALLBACK_AUDIO_FILENAME.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("call not found: {0}")]
    NotFound(CallId),
    #[error("checklist has no active criteria")]
    EmptyChecklist,
    #[error("audio download: {0}")]
    AudioFetch(AudioStoreError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("checklist: {0}")]
    Checklist(RepositoryError),
    #[error("analysis: {0}")]
    Analysis(AnalysisEngineError),
    #[error("persistence: {0}")]
    Persistence(RepositoryError),
    #[error("analysis of call {0} superseded by a newer run")]
    Superseded(CallId),
}

impl PipelineError {
    /// Summary written to the call when this error ends a run. `None` for
    /// errors that must not touch the record.
    pub fn failure_summary(&self) -> Option<&'static str> {
        match self {
            PipelineError::NotFound(_) | PipelineError::Superseded(_) => None,
            PipelineError::EmptyChecklist => Some(EMPTY_CHECKLIST_SUMMARY),
            PipelineError::AudioFetch(_) | PipelineError::Transcription(_) => {
                Some(TRANSCRIPTION_FAILED_SUMMARY)
            }
            PipelineError::Checklist(_)
            | PipelineError::Analysis(_)
            | PipelineError::Persistence(_) => Some(ANALYSIS_FAILED_SUMMARY),
        }
    }

    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::AudioFetch(_)
                | PipelineError::Transcription(_)
                | PipelineError::Analysis(_)
        )
    }
}
