use sqlx::Row;
use study_core::model::{Category, ChecklistItemKey, ChecklistState};

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{ChecklistRepository, StorageError};

#[async_trait::async_trait]
impl ChecklistRepository for SqliteRepository {
    async fn load_checklists(&self) -> Result<ChecklistState, StorageError> {
        let rows = sqlx::query("SELECT item_key, category, done FROM checklist_items")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut state = ChecklistState::new();
        for row in rows {
            let raw_key: String = row.try_get("item_key").map_err(ser)?;
            let key = match raw_key.parse::<ChecklistItemKey>() {
                Ok(key) => key,
                Err(err) => {
                    tracing::warn!(item_key = %raw_key, %err, "skipping unreadable checklist row");
                    continue;
                }
            };
            let category: Category = row
                .try_get::<String, _>("category")
                .map_err(ser)?
                .parse()
                .map_err(ser)?;
            let done: bool = row.try_get("done").map_err(ser)?;
            state.set(key, category, done);
        }
        Ok(state)
    }

    async fn toggle(
        &self,
        key: ChecklistItemKey,
        category: Category,
    ) -> Result<bool, StorageError> {
        let row = sqlx::query(
            r"
            INSERT INTO checklist_items (item_key, category, done)
            VALUES (?1, ?2, 1)
            ON CONFLICT(item_key, category) DO UPDATE SET
                done = 1 - checklist_items.done
            RETURNING done
            ",
        )
        .bind(key.to_string())
        .bind(category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(conn)?;

        row.try_get::<bool, _>("done").map_err(ser)
    }
}
