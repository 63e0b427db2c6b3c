use study_core::model::{WeekKey, WeeklyEntry, WeeklyLog, validate_hours};

use super::SqliteRepository;
use super::mapping::{conn, map_weekly_row, ser};
use crate::repository::{StorageError, WeeklyRepository};

#[async_trait::async_trait]
impl WeeklyRepository for SqliteRepository {
    async fn load_weekly(&self) -> Result<WeeklyLog, StorageError> {
        let rows = sqlx::query("SELECT week, hours_actual, notes FROM weekly_log ORDER BY week")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_weekly_row).collect()
    }

    async fn update_weekly(
        &self,
        week: &WeekKey,
        hours_actual: Option<f64>,
        notes: Option<&str>,
    ) -> Result<WeeklyEntry, StorageError> {
        if let Some(hours) = hours_actual {
            validate_hours(hours).map_err(ser)?;
        }
        let notes = notes.map(str::trim);

        let row = sqlx::query(
            r"
            INSERT INTO weekly_log (week, hours_actual, notes)
            VALUES (?1, COALESCE(?2, 0), COALESCE(?3, ''))
            ON CONFLICT(week) DO UPDATE SET
                hours_actual = COALESCE(?2, weekly_log.hours_actual),
                notes = COALESCE(?3, weekly_log.notes)
            RETURNING week, hours_actual, notes
            ",
        )
        .bind(week.as_str())
        .bind(hours_actual)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(conn)?;

        map_weekly_row(&row).map(|(_, entry)| entry)
    }
}
