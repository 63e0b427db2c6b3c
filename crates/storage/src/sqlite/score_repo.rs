use sqlx::Row;
use study_core::model::ScoreDraft;
use study_core::time::format_date;

use super::SqliteRepository;
use super::mapping::{conn, map_score_row, ser, to_i64};
use crate::repository::{ScoreRepository, StorageError};

#[async_trait::async_trait]
impl ScoreRepository for SqliteRepository {
    async fn list_scores(&self) -> Result<Vec<ScoreDraft>, StorageError> {
        let rows = sqlx::query("SELECT name, exam_date, score, notes FROM scores ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_score_row).collect()
    }

    async fn append_score(&self, score: &ScoreDraft) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO scores (name, exam_date, score, notes) VALUES (?1, ?2, ?3, ?4)")
            .bind(score.name.as_str())
            .bind(score.date.map(format_date))
            .bind(score.score)
            .bind(score.notes.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn delete_score_at(&self, index: usize) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let row = sqlx::query("SELECT id FROM scores ORDER BY id ASC LIMIT 1 OFFSET ?1")
            .bind(to_i64("index", index)?)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        let Some(row) = row else {
            return Ok(false);
        };
        let id: i64 = row.try_get("id").map_err(ser)?;

        sqlx::query("DELETE FROM scores WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        tx.commit().await.map_err(conn)?;
        Ok(true)
    }
}
