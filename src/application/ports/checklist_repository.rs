use async_trait::async_trait;

use crate::domain::{ChecklistItem, ChecklistItemId, ChecklistItemPatch, Criterion};

use super::RepositoryError;

/// Read side used by analysis: a snapshot of the active criteria.
#[async_trait]
pub trait ChecklistProvider: Send + Sync {
    /// Active items only, ordered by their order index. An empty result is
    /// not an error here.
    async fn active_criteria(&self) -> Result<Vec<Criterion>, RepositoryError>;
}

#[async_trait]
pub trait ChecklistRepository: ChecklistProvider {
    async fn list_all(&self) -> Result<Vec<ChecklistItem>, RepositoryError>;

    async fn create(&self, item: &ChecklistItem) -> Result<(), RepositoryError>;

    async fn update(
        &self,
        id: ChecklistItemId,
        patch: ChecklistItemPatch,
    ) -> Result<Option<ChecklistItem>, RepositoryError>;

    /// Returns `false` when no item had this id. Score rows referencing the
    /// item are removed with it.
    async fn delete(&self, id: ChecklistItemId) -> Result<bool, RepositoryError>;
}
