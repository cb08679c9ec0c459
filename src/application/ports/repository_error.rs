use crate::domain::{AnalysisStatus, CallId};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// A foreign key or uniqueness check rejected the write, e.g. a score for a deleted criterion.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// The call's run token changed: a newer analysis run owns the row.
    #[error("analysis run for call {0} was superseded")]
    StaleRun(CallId),
    /// The run still owns the call, but its current status cannot move to the requested one.
    #[error("call {call_id} cannot move from {from} to {to}")]
    InvalidTransition {
        call_id: CallId,
        from: AnalysisStatus,
        to: AnalysisStatus,
    },
}
