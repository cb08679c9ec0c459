use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub active_criteria: usize,
}

/// Liveness plus a checklist read, so a dead database shows up as 503.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.checklist_repository.list_all().await {
        Ok(items) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
                storage: "ok",
                active_criteria: items.iter().filter(|i| i.is_active).count(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the checklist");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    storage: "unavailable",
                    active_criteria: 0,
                }),
            )
        }
    }
}
