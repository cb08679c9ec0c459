use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_call_handler, create_checklist_item_handler, delete_checklist_item_handler,
    get_call_handler, health_handler, list_calls_handler, list_checklist_handler,
    update_checklist_item_handler, upload_call_handler,
};
use crate::presentation::state::AppState;

/// Room for multipart framing and the text fields around the audio part.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let upload_limit = state.intake_service.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/calls",
            get(list_calls_handler)
                .post(upload_call_handler)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/calls/{call_id}", get(get_call_handler))
        .route("/api/calls/{call_id}/analyze", post(analyze_call_handler))
        .route(
            "/api/checklist",
            get(list_checklist_handler).post(create_checklist_item_handler),
        )
        .route(
            "/api/checklist/{item_id}",
            put(update_checklist_item_handler).delete(delete_checklist_item_handler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
