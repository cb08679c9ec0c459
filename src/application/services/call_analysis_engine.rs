use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{AnalysisVerdict, ChecklistItemId, Criterion, CriterionVerdict, Score};
use crate::infrastructure::observability::sanitize_prompt;

const SYSTEM_PROMPT: &str = r#"Ты — эксперт по оценке качества телефонных звонков менеджеров по продажам в сфере строительства жилых домов.

Проанализируй транскрипт звонка и оцени менеджера по каждому критерию чеклиста.

Верни JSON в формате:
{
  "summary": "краткое резюме звонка (2-3 предложения)",
  "score": <общий процент выполнения, целое число 0-100>,
  "criteria": [
    {
      "criterion_id": "<id критерия>",
      "passed": true/false,
      "comment": "краткий комментарий почему выполнен/не выполнен"
    }
  ]
}

Используй только id критериев из чеклиста и оцени каждый критерий ровно один раз."#;

/// Scores a transcript against a checklist through a language model and
/// validates the model's answer before handing it on.
pub struct CallAnalysisEngine {
    llm_client: Arc<dyn LlmClient>,
    require_full_coverage: bool,
}

#[derive(Deserialize)]
struct RawVerdict {
    summary: String,
    score: serde_json::Number,
    criteria: Vec<RawCriterionVerdict>,
}

#[derive(Deserialize)]
struct RawCriterionVerdict {
    criterion_id: String,
    passed: bool,
    #[serde(default)]
    comment: Option<String>,
}

impl CallAnalysisEngine {
    pub fn new(llm_client: Arc<dyn LlmClient>, require_full_coverage: bool) -> Self {
        Self {
            llm_client,
            require_full_coverage,
        }
    }

    /// Numbered criteria, each tagged with its id, followed by the transcript.
    pub fn build_user_prompt(transcript: &str, criteria: &[Criterion]) -> String {
        let mut prompt = String::from("Чеклист критериев:\n");
        for (i, criterion) in criteria.iter().enumerate() {
            let _ = writeln!(
                prompt,
                "{}. [{}] {} — {}",
                i + 1,
                criterion.id,
                criterion.category,
                criterion.text
            );
        }
        let _ = write!(prompt, "\nТранскрипт звонка:\n{}", transcript);
        prompt
    }

    #[tracing::instrument(skip_all, fields(criteria = criteria.len(), transcript_chars = transcript.chars().count()))]
    pub async fn analyze(
        &self,
        transcript: &str,
        criteria: &[Criterion],
    ) -> Result<AnalysisVerdict, AnalysisEngineError> {
        let user_prompt = Self::build_user_prompt(transcript, criteria);

        let raw = self
            .llm_client
            .complete_json(SYSTEM_PROMPT, &user_prompt)
            .await?;

        let verdict = self.parse_verdict(&raw, criteria).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                response = %sanitize_prompt(&raw),
                "Rejected model verdict"
            );
        })?;

        tracing::info!(
            score = %verdict.score,
            scored = verdict.criteria.len(),
            "Call analysis verdict accepted"
        );

        Ok(verdict)
    }

    /// Validates the model's JSON against the verdict contract.
    ///
    /// Rejects non-JSON content, missing or mistyped fields, fractional or
    /// out-of-range scores, and criterion ids that were not supplied or
    /// appear twice. Missing criteria are rejected only when full coverage
    /// is required.
    pub fn parse_verdict(
        &self,
        raw: &str,
        criteria: &[Criterion],
    ) -> Result<AnalysisVerdict, AnalysisEngineError> {
        let value: serde_json::Value = serde_json::from_str(raw.trim())
            .map_err(|e| AnalysisEngineError::MalformedJson(e.to_string()))?;

        if !value.is_object() {
            return Err(AnalysisEngineError::InvalidVerdict(
                "top-level value is not an object".to_string(),
            ));
        }

        let parsed: RawVerdict = serde_json::from_value(value)
            .map_err(|e| AnalysisEngineError::InvalidVerdict(e.to_string()))?;

        let score = parse_score(&parsed.score)?;

        let supplied: HashSet<ChecklistItemId> = criteria.iter().map(|c| c.id).collect();
        let mut seen = HashSet::with_capacity(parsed.criteria.len());
        let mut verdicts = Vec::with_capacity(parsed.criteria.len());

        for entry in parsed.criteria {
            let uuid = Uuid::parse_str(entry.criterion_id.trim()).map_err(|_| {
                AnalysisEngineError::InvalidVerdict(format!(
                    "criterion id is not a uuid: {}",
                    entry.criterion_id
                ))
            })?;
            let criterion_id = ChecklistItemId::from_uuid(uuid);

            if !supplied.contains(&criterion_id) {
                return Err(AnalysisEngineError::InvalidVerdict(format!(
                    "unknown criterion id: {}",
                    criterion_id
                )));
            }
            if !seen.insert(criterion_id) {
                return Err(AnalysisEngineError::InvalidVerdict(format!(
                    "duplicate criterion id: {}",
                    criterion_id
                )));
            }

            verdicts.push(CriterionVerdict {
                criterion_id,
                passed: entry.passed,
                comment: entry.comment.unwrap_or_default(),
            });
        }

        let missing = supplied.len() - seen.len();
        if missing > 0 {
            if self.require_full_coverage {
                return Err(AnalysisEngineError::IncompleteVerdict {
                    missing,
                    expected: supplied.len(),
                });
            }
            tracing::warn!(
                missing,
                expected = supplied.len(),
                "Model verdict does not cover every criterion"
            );
        }

        Ok(AnalysisVerdict {
            summary: parsed.summary,
            score,
            criteria: verdicts,
        })
    }
}

fn parse_score(number: &serde_json::Number) -> Result<Score, AnalysisEngineError> {
    let value = match number.as_i64() {
        Some(v) => v,
        None => match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.is_finite() => f as i64,
            _ => {
                return Err(AnalysisEngineError::InvalidVerdict(format!(
                    "score is not an integer: {}",
                    number
                )));
            }
        },
    };

    Score::new(value).map_err(|e| AnalysisEngineError::InvalidVerdict(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisEngineError {
    #[error("llm: {0}")]
    Llm(#[from] LlmClientError),
    #[error("model output is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("model output violates the verdict contract: {0}")]
    InvalidVerdict(String),
    #[error("model verdict misses {missing} of {expected} criteria")]
    IncompleteVerdict { missing: usize, expected: usize },
}
