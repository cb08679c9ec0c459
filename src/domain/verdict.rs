use super::{CallId, ChecklistItemId, CriterionScore, Score};

/// Validated outcome of scoring one transcript against a checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisVerdict {
    pub summary: String,
    /// The model's own percentage. Not recomputed from `criteria`.
    pub score: Score,
    pub criteria: Vec<CriterionVerdict>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionVerdict {
    pub criterion_id: ChecklistItemId,
    pub passed: bool,
    pub comment: String,
}

impl AnalysisVerdict {
    pub fn to_scores(&self, call_id: CallId) -> Vec<CriterionScore> {
        self.criteria
            .iter()
            .map(|c| CriterionScore {
                call_id,
                criterion_id: c.criterion_id,
                passed: c.passed,
                ai_comment: c.comment.clone(),
            })
            .collect()
    }
}
