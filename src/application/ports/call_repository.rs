use async_trait::async_trait;

use crate::domain::{
    AnalysisStatus, Call, CallId, CriterionScore, CriterionScoreView, RunToken, Score, UserId,
};

use super::RepositoryError;

/// Fields merged into a call together with its status, in one write.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: AnalysisStatus,
    pub transcript: Option<String>,
    pub summary: Option<String>,
}

impl StatusUpdate {
    pub fn to(status: AnalysisStatus) -> Self {
        Self {
            status,
            transcript: None,
            summary: None,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

#[async_trait]
pub trait CallRepository: Send + Sync {
    async fn create(&self, call: &Call) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: CallId) -> Result<Option<Call>, RepositoryError>;

    /// Newest first, optionally restricted to one manager.
    async fn list(&self, manager_id: Option<UserId>) -> Result<Vec<Call>, RepositoryError>;

    async fn criterion_scores(
        &self,
        id: CallId,
    ) -> Result<Vec<CriterionScoreView>, RepositoryError>;

    /// Stamps `token` as the call's current run, moves it to `transcribing`
    /// and clears transcript, score and summary. Prior criterion scores stay
    /// until the run completes.
    async fn begin_run(&self, id: CallId, token: RunToken) -> Result<(), RepositoryError>;

    /// Applies `update` only while `token` is still the call's current run,
    /// otherwise fails with [`RepositoryError::StaleRun`]. A move the status
    /// machine forbids fails with [`RepositoryError::InvalidTransition`].
    async fn update_status(
        &self,
        id: CallId,
        token: RunToken,
        update: StatusUpdate,
    ) -> Result<(), RepositoryError>;

    /// Atomically replaces every criterion score of the call with `scores`
    /// and finalizes it as `done` with `score` and `summary`. Nothing is
    /// written when `token` is stale, the call is not `analyzing`, or any
    /// statement fails.
    async fn complete_run(
        &self,
        id: CallId,
        token: RunToken,
        score: Score,
        summary: &str,
        scores: &[CriterionScore],
    ) -> Result<(), RepositoryError>;
}
