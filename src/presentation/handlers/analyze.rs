use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::Instrument;

use crate::application::services::PipelineError;
use crate::domain::CallId;
use crate::presentation::state::AppState;

use super::error_response::{error_response, parse_id};

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub score: u8,
    pub summary: String,
}

/// Runs the analysis pipeline for one call and reports its outcome.
///
/// The run is spawned so that it reaches a terminal status even when the
/// caller stops waiting after the deadline.
#[tracing::instrument(skip(state))]
pub async fn analyze_call_handler(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Response {
    let call_id = match parse_id(&call_id, "call") {
        Ok(uuid) => CallId::from_uuid(uuid),
        Err(response) => return response,
    };

    let pipeline = Arc::clone(&state.analysis_pipeline);
    let run = tokio::spawn(async move { pipeline.run(call_id).await }.in_current_span());

    match tokio::time::timeout(state.analysis_deadline, run).await {
        Ok(Ok(Ok(outcome))) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                success: true,
                score: outcome.score.value(),
                summary: outcome.summary,
            }),
        )
            .into_response(),
        Ok(Ok(Err(e))) => pipeline_error_response(&e),
        Ok(Err(join_error)) => {
            tracing::error!(error = %join_error, "Analysis task aborted");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed")
        }
        Err(_) => {
            tracing::warn!(
                deadline_secs = state.analysis_deadline.as_secs(),
                "Analysis exceeded deadline, run continues in background"
            );
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Analysis is taking longer than expected",
            )
        }
    }
}

fn pipeline_error_response(error: &PipelineError) -> Response {
    match error {
        PipelineError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Call not found"),
        PipelineError::EmptyChecklist => {
            error_response(StatusCode::BAD_REQUEST, "No checklist items")
        }
        PipelineError::Superseded(_) => error_response(
            StatusCode::CONFLICT,
            "Analysis superseded by a newer run",
        ),
        PipelineError::AudioFetch(_)
        | PipelineError::Transcription(_)
        | PipelineError::Checklist(_)
        | PipelineError::Analysis(_)
        | PipelineError::Persistence(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed")
        }
    }
}
