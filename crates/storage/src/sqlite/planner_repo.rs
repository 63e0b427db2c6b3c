use sqlx::{Sqlite, Transaction};
use study_core::model::PlanEntry;
use study_core::time::format_date;

use super::SqliteRepository;
use super::mapping::{conn, map_plan_row, to_i64};
use crate::repository::{PlannerRepository, StorageError};

async fn insert_entries(
    tx: &mut Transaction<'_, Sqlite>,
    entries: &[PlanEntry],
) -> Result<(), StorageError> {
    for (position, entry) in entries.iter().enumerate() {
        let topic_idx = entry
            .topic_index()
            .map(|idx| to_i64("topic_idx", idx))
            .transpose()?;

        sqlx::query(
            r"
            INSERT INTO planner_items (id, position, name, start_date, days, topic_idx)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(to_i64("id", entry.id().value())?)
        .bind(to_i64("position", position)?)
        .bind(entry.name())
        .bind(format_date(entry.start()))
        .bind(i64::from(entry.days()))
        .bind(topic_idx)
        .execute(&mut **tx)
        .await
        .map_err(conn)?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl PlannerRepository for SqliteRepository {
    async fn list_plan(&self) -> Result<Vec<PlanEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, start_date, days, topic_idx
            FROM planner_items
            ORDER BY position ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_plan_row).collect()
    }

    async fn replace_plan(&self, entries: &[PlanEntry]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        sqlx::query("DELETE FROM planner_items")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        insert_entries(&mut tx, entries).await?;
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn seed_plan_if_empty(&self, entries: &[PlanEntry]) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let existing = sqlx::query("SELECT 1 FROM planner_items LIMIT 1")
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if existing.is_some() {
            return Ok(false);
        }
        insert_entries(&mut tx, entries).await?;
        tx.commit().await.map_err(conn)?;
        tracing::info!(entries = entries.len(), "seeded default study plan");
        Ok(true)
    }
}
