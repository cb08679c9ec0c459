use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ChecklistProvider, ChecklistRepository, RepositoryError};
use crate::domain::{ChecklistItem, ChecklistItemId, ChecklistItemPatch, Criterion};

use super::map_sqlx_error;

pub struct PgChecklistRepository {
    pool: PgPool,
}

impl PgChecklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChecklistItemRow {
    id: Uuid,
    category: String,
    criterion: String,
    weight: i32,
    is_active: bool,
    order_index: i32,
}

impl From<ChecklistItemRow> for ChecklistItem {
    fn from(r: ChecklistItemRow) -> Self {
        Self {
            id: ChecklistItemId::from_uuid(r.id),
            category: r.category,
            criterion: r.criterion,
            weight: r.weight,
            is_active: r.is_active,
            order_index: r.order_index,
        }
    }
}

#[async_trait]
impl ChecklistProvider for PgChecklistRepository {
    #[instrument(skip(self))]
    async fn active_criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        let rows: Vec<ChecklistItemRow> = sqlx::query_as(
            r#"
            SELECT id, category, criterion, weight, is_active, order_index
            FROM checklist_items
            WHERE is_active
            ORDER BY order_index, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| ChecklistItem::from(r).as_criterion())
            .collect())
    }
}

#[async_trait]
impl ChecklistRepository for PgChecklistRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<ChecklistItem>, RepositoryError> {
        let rows: Vec<ChecklistItemRow> = sqlx::query_as(
            r#"
            SELECT id, category, criterion, weight, is_active, order_index
            FROM checklist_items
            ORDER BY order_index, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ChecklistItem::from).collect())
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn create(&self, item: &ChecklistItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO checklist_items (id, category, criterion, weight, is_active, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.category)
        .bind(&item.criterion)
        .bind(item.weight)
        .bind(item.is_active)
        .bind(item.order_index)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    #[instrument(skip(self, patch), fields(item_id = %id))]
    async fn update(
        &self,
        id: ChecklistItemId,
        patch: ChecklistItemPatch,
    ) -> Result<Option<ChecklistItem>, RepositoryError> {
        let row: Option<ChecklistItemRow> = sqlx::query_as(
            r#"
            UPDATE checklist_items
            SET category = COALESCE($2, category),
                criterion = COALESCE($3, criterion),
                weight = COALESCE($4, weight),
                is_active = COALESCE($5, is_active),
                order_index = COALESCE($6, order_index)
            WHERE id = $1
            RETURNING id, category, criterion, weight, is_active, order_index
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch.category)
        .bind(patch.criterion)
        .bind(patch.weight)
        .bind(patch.is_active)
        .bind(patch.order_index)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ChecklistItem::from))
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn delete(&self, id: ChecklistItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM checklist_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
