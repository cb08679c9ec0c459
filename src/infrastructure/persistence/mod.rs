mod pg_pool;
mod repositories;

pub use repositories::InMemoryRepository;
pub use repositories::PgCallRepository;
pub use repositories::PgChecklistRepository;

pub use pg_pool::{create_pool, run_migrations};
