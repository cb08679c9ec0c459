mod analyze;
mod calls;
mod checklist;
mod error_response;
mod health;

pub use analyze::{AnalyzeResponse, analyze_call_handler};
pub use calls::{
    CallDetailResponse, CallResponse, CriterionScoreResponse, get_call_handler,
    list_calls_handler, upload_call_handler,
};
pub use checklist::{
    ChecklistItemResponse, create_checklist_item_handler, delete_checklist_item_handler,
    list_checklist_handler, update_checklist_item_handler,
};
pub use error_response::ErrorResponse;
pub use health::health_handler;
