use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::{ChecklistItem, ChecklistItemId, ChecklistItemPatch, DEFAULT_WEIGHT};
use crate::presentation::state::AppState;

use super::error_response::{error_response, parse_id};

#[derive(Debug, Serialize)]
pub struct ChecklistItemResponse {
    pub id: String,
    pub category: String,
    pub criterion: String,
    pub weight: i32,
    pub is_active: bool,
    pub order_index: i32,
}

impl From<ChecklistItem> for ChecklistItemResponse {
    fn from(item: ChecklistItem) -> Self {
        Self {
            id: item.id.to_string(),
            category: item.category,
            criterion: item.criterion,
            weight: item.weight,
            is_active: item.is_active,
            order_index: item.order_index,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateChecklistItemRequest {
    pub category: String,
    pub criterion: String,
    pub weight: Option<i32>,
    pub is_active: Option<bool>,
    /// Appended after the last item when absent.
    pub order_index: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChecklistItemRequest {
    pub category: Option<String>,
    pub criterion: Option<String>,
    pub weight: Option<i32>,
    pub is_active: Option<bool>,
    pub order_index: Option<i32>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

fn blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}

#[tracing::instrument(skip(state))]
pub async fn list_checklist_handler(State(state): State<AppState>) -> Response {
    match state.checklist_repository.list_all().await {
        Ok(items) => {
            let body: Vec<ChecklistItemResponse> =
                items.into_iter().map(ChecklistItemResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list checklist");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn create_checklist_item_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateChecklistItemRequest>,
) -> Response {
    if blank(Some(&request.category)) || blank(Some(&request.criterion)) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "category and criterion must not be empty",
        );
    }

    let order_index = match request.order_index {
        Some(index) => index,
        None => match state.checklist_repository.list_all().await {
            Ok(items) => next_order_index(&items),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read checklist for ordering");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        },
    };

    let mut item = ChecklistItem::new(
        request.category.trim().to_string(),
        request.criterion.trim().to_string(),
        order_index,
    );
    item.weight = request.weight.unwrap_or(DEFAULT_WEIGHT);
    item.is_active = request.is_active.unwrap_or(true);

    match state.checklist_repository.create(&item).await {
        Ok(()) => {
            tracing::info!(item_id = %item.id, "Checklist item created");
            (StatusCode::CREATED, Json(ChecklistItemResponse::from(item))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create checklist item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn update_checklist_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateChecklistItemRequest>,
) -> Response {
    let id = match parse_id(&item_id, "checklist item") {
        Ok(uuid) => ChecklistItemId::from_uuid(uuid),
        Err(response) => return response,
    };

    if blank(request.category.as_deref()) || blank(request.criterion.as_deref()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "category and criterion must not be empty",
        );
    }

    let patch = ChecklistItemPatch {
        category: request.category.map(|c| c.trim().to_string()),
        criterion: request.criterion.map(|c| c.trim().to_string()),
        weight: request.weight,
        is_active: request.is_active,
        order_index: request.order_index,
    };

    match state.checklist_repository.update(id, patch).await {
        Ok(Some(item)) => (StatusCode::OK, Json(ChecklistItemResponse::from(item))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Checklist item not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update checklist item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_checklist_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Response {
    let id = match parse_id(&item_id, "checklist item") {
        Ok(uuid) => ChecklistItemId::from_uuid(uuid),
        Err(response) => return response,
    };

    match state.checklist_repository.delete(id).await {
        Ok(true) => (StatusCode::OK, Json(DeleteResponse { success: true })).into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Checklist item not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete checklist item");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Places a new item after the last one; stays at `i32::MAX` once that slot is taken.
fn next_order_index(items: &[ChecklistItem]) -> i32 {
    items
        .iter()
        .map(|i| i.order_index.saturating_add(1))
        .max()
        .unwrap_or(0)
}
