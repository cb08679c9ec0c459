use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{CallRepository, ChecklistRepository};
use crate::application::services::{AnalysisPipeline, CallIntakeService};

#[derive(Clone)]
pub struct AppState {
    pub analysis_pipeline: Arc<AnalysisPipeline>,
    pub intake_service: Arc<CallIntakeService>,
    pub call_repository: Arc<dyn CallRepository>,
    pub checklist_repository: Arc<dyn ChecklistRepository>,
    pub analysis_deadline: Duration,
}
