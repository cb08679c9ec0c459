use chrono::{DateTime, Utc};

use super::{AnalysisStatus, CallId, ChecklistItemId, RunToken, Score, UserId};

pub const EMPTY_CHECKLIST_SUMMARY: &str = "Чеклист пуст";
pub const TRANSCRIPTION_FAILED_SUMMARY: &str = "Ошибка при транскрибации";
pub const ANALYSIS_FAILED_SUMMARY: &str = "Ошибка при анализе";

/// One uploaded sales-call recording and the outcome of its latest analysis.
///
/// `transcript` is only set once the call reached `analyzing`. `score` is
/// only set in `done`. `summary` holds the model summary in `done` and a
/// short operator-facing failure message in `error`.
#[derive(Debug, Clone)]
pub struct Call {
    pub id: CallId,
    pub manager_id: UserId,
    pub client_id: Option<UserId>,
    pub audio_url: String,
    pub transcript: Option<String>,
    pub score: Option<Score>,
    pub summary: Option<String>,
    pub status: AnalysisStatus,
    pub run_token: Option<RunToken>,
    pub created_at: DateTime<Utc>,
}

impl Call {
    pub fn new(manager_id: UserId, client_id: Option<UserId>, audio_url: String) -> Self {
        Self {
            id: CallId::new(),
            manager_id,
            client_id,
            audio_url,
            transcript: None,
            score: None,
            summary: None,
            status: AnalysisStatus::Pending,
            run_token: None,
            created_at: Utc::now(),
        }
    }
}

/// Persisted pass/fail verdict for one criterion of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScore {
    pub call_id: CallId,
    pub criterion_id: ChecklistItemId,
    pub passed: bool,
    pub ai_comment: String,
}

/// Criterion score joined with the criterion it refers to, for detail views.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionScoreView {
    pub criterion_id: ChecklistItemId,
    pub category: String,
    pub criterion: String,
    pub passed: bool,
    pub ai_comment: String,
}
