use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{CallRepository, RepositoryError, StatusUpdate};
use crate::domain::{
    AnalysisStatus, Call, CallId, ChecklistItemId, CriterionScore, CriterionScoreView, RunToken,
    Score, UserId,
};

use super::map_sqlx_error;

pub struct PgCallRepository {
    pool: PgPool,
}

impl PgCallRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explains why a token- and status-guarded write touched no row.
    async fn rejected_write(
        &self,
        id: CallId,
        token: RunToken,
        to: AnalysisStatus,
    ) -> RepositoryError {
        let row: Option<(String, Option<Uuid>)> =
            match sqlx::query_as("SELECT analysis_status, run_token FROM calls WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
            {
                Ok(row) => row,
                Err(e) => return map_sqlx_error(e),
            };

        match row {
            None => RepositoryError::NotFound(id.to_string()),
            Some((_, current)) if current != Some(token.as_uuid()) => {
                RepositoryError::StaleRun(id)
            }
            Some((status, _)) => match status.parse::<AnalysisStatus>() {
                Ok(from) => RepositoryError::InvalidTransition { call_id: id, from, to },
                Err(e) => RepositoryError::QueryFailed(e),
            },
        }
    }
}

fn allowed_from(to: AnalysisStatus) -> Vec<String> {
    AnalysisStatus::predecessors(to)
        .iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

#[derive(sqlx::FromRow)]
struct CallRow {
    id: Uuid,
    manager_id: Uuid,
    client_id: Option<Uuid>,
    audio_url: String,
    transcript: Option<String>,
    score: Option<i32>,
    ai_summary: Option<String>,
    analysis_status: String,
    run_token: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CallRow> for Call {
    type Error = RepositoryError;

    fn try_from(r: CallRow) -> Result<Self, Self::Error> {
        let status = r
            .analysis_status
            .parse::<AnalysisStatus>()
            .map_err(RepositoryError::QueryFailed)?;
        let score = r
            .score
            .map(Score::try_from)
            .transpose()
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(Call {
            id: CallId::from_uuid(r.id),
            manager_id: UserId::from_uuid(r.manager_id),
            client_id: r.client_id.map(UserId::from_uuid),
            audio_url: r.audio_url,
            transcript: r.transcript,
            score,
            summary: r.ai_summary,
            status,
            run_token: r.run_token.map(RunToken::from_uuid),
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ScoreViewRow {
    criterion_id: Uuid,
    category: String,
    criterion: String,
    passed: bool,
    ai_comment: String,
}

const CALL_COLUMNS: &str = "id, manager_id, client_id, audio_url, transcript, score, ai_summary, \
                            analysis_status, run_token, created_at";

#[async_trait]
impl CallRepository for PgCallRepository {
    #[instrument(skip(self, call), fields(call_id = %call.id))]
    async fn create(&self, call: &Call) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO calls (id, manager_id, client_id, audio_url, transcript, score,
                               ai_summary, analysis_status, run_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(call.id.as_uuid())
        .bind(call.manager_id.as_uuid())
        .bind(call.client_id.map(|id| id.as_uuid()))
        .bind(&call.audio_url)
        .bind(&call.transcript)
        .bind(call.score.map(|s| i32::from(s.value())))
        .bind(&call.summary)
        .bind(call.status.as_str())
        .bind(call.run_token.map(|t| t.as_uuid()))
        .bind(call.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(call_id = %id))]
    async fn get_by_id(&self, id: CallId) -> Result<Option<Call>, RepositoryError> {
        let row: Option<CallRow> =
            sqlx::query_as(&format!("SELECT {CALL_COLUMNS} FROM calls WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(Call::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, manager_id: Option<UserId>) -> Result<Vec<Call>, RepositoryError> {
        let rows: Vec<CallRow> = sqlx::query_as(&format!(
            "SELECT {CALL_COLUMNS} FROM calls \
             WHERE ($1::uuid IS NULL OR manager_id = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(manager_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Call::try_from).collect()
    }

    #[instrument(skip(self), fields(call_id = %id))]
    async fn criterion_scores(
        &self,
        id: CallId,
    ) -> Result<Vec<CriterionScoreView>, RepositoryError> {
        let rows: Vec<ScoreViewRow> = sqlx::query_as(
            r#"
            SELECT s.criterion_id, c.category, c.criterion, s.passed, s.ai_comment
            FROM call_criterion_scores s
            JOIN checklist_items c ON c.id = s.criterion_id
            WHERE s.call_id = $1
            ORDER BY c.order_index, c.category
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| CriterionScoreView {
                criterion_id: ChecklistItemId::from_uuid(r.criterion_id),
                category: r.category,
                criterion: r.criterion,
                passed: r.passed,
                ai_comment: r.ai_comment,
            })
            .collect())
    }

    #[instrument(skip(self), fields(call_id = %id, run_token = %token))]
    async fn begin_run(&self, id: CallId, token: RunToken) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE calls
            SET analysis_status = $1, run_token = $2,
                transcript = NULL, score = NULL, ai_summary = NULL
            WHERE id = $3
            "#,
        )
        .bind(AnalysisStatus::Transcribing.as_str())
        .bind(token.as_uuid())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, update), fields(call_id = %id, run_token = %token, status = %update.status))]
    async fn update_status(
        &self,
        id: CallId,
        token: RunToken,
        update: StatusUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE calls
            SET analysis_status = $1,
                transcript = COALESCE($2, transcript),
                ai_summary = COALESCE($3, ai_summary)
            WHERE id = $4 AND run_token = $5 AND analysis_status = ANY($6::text[])
            "#,
        )
        .bind(update.status.as_str())
        .bind(update.transcript)
        .bind(update.summary)
        .bind(id.as_uuid())
        .bind(token.as_uuid())
        .bind(allowed_from(update.status))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(self.rejected_write(id, token, update.status).await);
        }
        Ok(())
    }

    #[instrument(skip(self, summary, scores), fields(call_id = %id, run_token = %token, rows = scores.len()))]
    async fn complete_run(
        &self,
        id: CallId,
        token: RunToken,
        score: Score,
        summary: &str,
        scores: &[CriterionScore],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let finalized = sqlx::query(
            r#"
            UPDATE calls
            SET analysis_status = $1, score = $2, ai_summary = $3
            WHERE id = $4 AND run_token = $5 AND analysis_status = ANY($6::text[])
            "#,
        )
        .bind(AnalysisStatus::Done.as_str())
        .bind(i32::from(score.value()))
        .bind(summary)
        .bind(id.as_uuid())
        .bind(token.as_uuid())
        .bind(allowed_from(AnalysisStatus::Done))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if finalized.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Err(self.rejected_write(id, token, AnalysisStatus::Done).await);
        }

        sqlx::query("DELETE FROM call_criterion_scores WHERE call_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let criterion_ids: Vec<Uuid> = scores.iter().map(|s| s.criterion_id.as_uuid()).collect();
        let passed: Vec<bool> = scores.iter().map(|s| s.passed).collect();
        let comments: Vec<String> = scores.iter().map(|s| s.ai_comment.clone()).collect();

        sqlx::query(
            r#"
            INSERT INTO call_criterion_scores (call_id, criterion_id, passed, ai_comment)
            SELECT $1, criterion_id, passed, ai_comment
            FROM UNNEST($2::uuid[], $3::bool[], $4::text[]) AS t(criterion_id, passed, ai_comment)
            "#,
        )
        .bind(id.as_uuid())
        .bind(criterion_ids)
        .bind(passed)
        .bind(comments)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }
}
