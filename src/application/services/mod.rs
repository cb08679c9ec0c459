mod analysis_pipeline;
mod call_analysis_engine;
mod call_intake_service;

pub use analysis_pipeline::{AnalysisOutcome, AnalysisPipeline, PipelineError};
pub use call_analysis_engine::{AnalysisEngineError, CallAnalysisEngine};
pub use call_intake_service::{AudioUpload, CallIntakeService, IntakeError};
