use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{AudioUpload, IntakeError};
use crate::domain::{Call, CallId, CriterionScoreView, UserId};
use crate::presentation::state::AppState;

use super::error_response::{error_response, parse_id};

#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub id: String,
    pub manager_id: String,
    pub client_id: Option<String>,
    pub audio_url: String,
    pub transcript: Option<String>,
    pub score: Option<u8>,
    pub analysis_status: String,
    pub ai_summary: Option<String>,
    pub created_at: String,
}

impl From<Call> for CallResponse {
    fn from(call: Call) -> Self {
        Self {
            id: call.id.to_string(),
            manager_id: call.manager_id.to_string(),
            client_id: call.client_id.map(|id| id.to_string()),
            audio_url: call.audio_url,
            transcript: call.transcript,
            score: call.score.map(|s| s.value()),
            analysis_status: call.status.as_str().to_string(),
            ai_summary: call.summary,
            created_at: call.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CriterionScoreResponse {
    pub criterion_id: String,
    pub category: String,
    pub criterion: String,
    pub passed: bool,
    pub ai_comment: String,
}

impl From<CriterionScoreView> for CriterionScoreResponse {
    fn from(view: CriterionScoreView) -> Self {
        Self {
            criterion_id: view.criterion_id.to_string(),
            category: view.category,
            criterion: view.criterion,
            passed: view.passed,
            ai_comment: view.ai_comment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CallDetailResponse {
    #[serde(flatten)]
    pub call: CallResponse,
    pub call_criterion_scores: Vec<CriterionScoreResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ListCallsQuery {
    pub manager_id: Option<Uuid>,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_call_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut audio: Option<(String, Option<String>, Bytes)> = None;
    let mut manager_id: Option<String> = None;
    let mut client_id: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return error_response(e.status(), format!("Failed to read multipart: {}", e));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let filename = field.file_name().unwrap_or("call").to_string();
                let content_type = field.content_type().map(String::from);
                let data = match field.bytes().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read audio bytes");
                        return error_response(e.status(), format!("Failed to read file: {}", e));
                    }
                };
                audio = Some((filename, content_type, data));
            }
            "manager_id" | "client_id" => {
                let value = match field.text().await {
                    Ok(v) => v.trim().to_string(),
                    Err(e) => {
                        return error_response(e.status(), format!("Failed to read {}: {}", name, e));
                    }
                };
                if name == "manager_id" {
                    manager_id = Some(value);
                } else if !value.is_empty() {
                    client_id = Some(value);
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((filename, content_type, data)) = audio else {
        return error_response(StatusCode::BAD_REQUEST, "Audio file is required");
    };

    let manager_id = match manager_id.as_deref().map(|raw| parse_id(raw, "manager")) {
        Some(Ok(uuid)) => UserId::from_uuid(uuid),
        Some(Err(response)) => return response,
        None => return error_response(StatusCode::BAD_REQUEST, "manager_id is required"),
    };

    let client_id = match client_id.as_deref().map(|raw| parse_id(raw, "client")) {
        Some(Ok(uuid)) => Some(UserId::from_uuid(uuid)),
        Some(Err(response)) => return response,
        None => None,
    };

    let upload = AudioUpload {
        filename,
        content_type,
        data,
        manager_id,
        client_id,
    };

    match state.intake_service.accept(upload).await {
        Ok(call) => (StatusCode::CREATED, Json(CallResponse::from(call))).into_response(),
        Err(e @ IntakeError::UnsupportedFormat(_)) => {
            error_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
        }
        Err(e @ IntakeError::TooLarge { .. }) => {
            error_response(StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
        }
        Err(e @ IntakeError::EmptyFile) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e @ IntakeError::Storage(_)) => {
            tracing::error!(error = %e, "Failed to store audio");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload file")
        }
        Err(e @ IntakeError::Repository(_)) => {
            tracing::error!(error = %e, "Failed to create call record");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create call record",
            )
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_calls_handler(
    State(state): State<AppState>,
    Query(query): Query<ListCallsQuery>,
) -> Response {
    match state
        .call_repository
        .list(query.manager_id.map(UserId::from_uuid))
        .await
    {
        Ok(calls) => {
            let body: Vec<CallResponse> = calls.into_iter().map(CallResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list calls");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_call_handler(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Response {
    let id = match parse_id(&call_id, "call") {
        Ok(uuid) => CallId::from_uuid(uuid),
        Err(response) => return response,
    };

    let call = match state.call_repository.get_by_id(id).await {
        Ok(Some(call)) => call,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Call not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch call");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    match state.call_repository.criterion_scores(id).await {
        Ok(scores) => (
            StatusCode::OK,
            Json(CallDetailResponse {
                call: CallResponse::from(call),
                call_criterion_scores: scores
                    .into_iter()
                    .map(CriterionScoreResponse::from)
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch criterion scores");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
