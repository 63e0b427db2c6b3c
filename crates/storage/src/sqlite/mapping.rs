use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use study_core::model::{PlanEntry, PlanEntryId, ScoreDraft, WeekKey, WeeklyEntry};
use study_core::time::parse_date;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn to_i64<T>(field: &'static str, v: T) -> Result<i64, StorageError>
where
    i64: TryFrom<T>,
{
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn from_i64<T>(field: &'static str, v: i64) -> Result<T, StorageError>
where
    T: TryFrom<i64>,
{
    T::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

pub(crate) fn map_plan_row(row: &SqliteRow) -> Result<PlanEntry, StorageError> {
    let id: u64 = from_i64("id", row.try_get::<i64, _>("id").map_err(ser)?)?;
    let name: String = row.try_get("name").map_err(ser)?;
    let start = parse_date(&row.try_get::<String, _>("start_date").map_err(ser)?).map_err(ser)?;
    let days: u32 = from_i64("days", row.try_get::<i64, _>("days").map_err(ser)?)?;
    let topic_index = row
        .try_get::<Option<i64>, _>("topic_idx")
        .map_err(ser)?
        .map(|v| from_i64::<usize>("topic_idx", v))
        .transpose()?;

    PlanEntry::new(PlanEntryId::new(id), name, topic_index, start, days).map_err(ser)
}

pub(crate) fn map_score_row(row: &SqliteRow) -> Result<ScoreDraft, StorageError> {
    let date = row
        .try_get::<Option<String>, _>("exam_date")
        .map_err(ser)?
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date(&raw))
        .transpose()
        .map_err(ser)?;

    Ok(ScoreDraft {
        name: row.try_get("name").map_err(ser)?,
        date,
        score: row.try_get("score").map_err(ser)?,
        notes: row.try_get("notes").map_err(ser)?,
    })
}

pub(crate) fn map_weekly_row(row: &SqliteRow) -> Result<(WeekKey, WeeklyEntry), StorageError> {
    let week = WeekKey::new(row.try_get::<String, _>("week").map_err(ser)?).map_err(ser)?;
    let entry = WeeklyEntry {
        hours_actual: row.try_get("hours_actual").map_err(ser)?,
        notes: row.try_get("notes").map_err(ser)?,
    };
    Ok((week, entry))
}
