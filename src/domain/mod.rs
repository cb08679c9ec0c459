mod analysis_status;
mod audio_format;
mod call;
mod checklist_item;
mod ids;
mod score;
mod storage_path;
mod verdict;

pub use analysis_status::AnalysisStatus;
pub use audio_format::AudioFormat;
pub use call::{
    ANALYSIS_FAILED_SUMMARY, Call, CriterionScore, CriterionScoreView,
    EMPTY_CHECKLIST_SUMMARY, TRANSCRIPTION_FAILED_SUMMARY,
};
pub use checklist_item::{ChecklistItem, ChecklistItemPatch, Criterion, DEFAULT_WEIGHT};
pub use ids::{CallId, ChecklistItemId, RunToken, UserId};
pub use score::{Score, ScoreOutOfRange};
pub use storage_path::StoragePath;
pub use verdict::{AnalysisVerdict, CriterionVerdict};
