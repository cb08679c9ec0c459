mod in_memory_repository;
mod pg_call_repository;
mod pg_checklist_repository;

pub use in_memory_repository::InMemoryRepository;
pub use pg_call_repository::PgCallRepository;
pub use pg_checklist_repository::PgChecklistRepository;

use crate::application::ports::RepositoryError;

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::RowNotFound => RepositoryError::NotFound(e.to_string()),
        sqlx::Error::Database(ref db) if db.constraint().is_some() => {
            RepositoryError::ConstraintViolation(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::ConnectionFailed(e.to_string())
        }
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}
