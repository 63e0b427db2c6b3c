use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::PlanEntryId;

/// A scheduled block of study time.
///
/// `topic_index` is `None` for review blocks. `days` is always at least 1, the
/// span `start..=end` is inclusive and `end` is always a representable date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPlanEntry")]
pub struct PlanEntry {
    id: PlanEntryId,
    name: String,
    #[serde(rename = "topic_idx")]
    topic_index: Option<usize>,
    start: NaiveDate,
    days: u32,
}

impl PlanEntry {
    /// Build a validated plan entry.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDays` if `days` is zero or the block
    /// would end past the last representable date.
    pub fn new(
        id: PlanEntryId,
        name: impl Into<String>,
        topic_index: Option<usize>,
        start: NaiveDate,
        days: u32,
    ) -> Result<Self, ValidationError> {
        span_end(start, days)?;
        Ok(Self {
            id,
            name: name.into(),
            topic_index,
            start,
            days,
        })
    }

    #[must_use]
    pub fn id(&self) -> PlanEntryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn topic_index(&self) -> Option<usize> {
        self.topic_index
    }

    /// Review blocks carry no checklist linkage.
    #[must_use]
    pub fn is_review(&self) -> bool {
        self.topic_index.is_none()
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Last day of the block: `start + days - 1`.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        span_end(self.start, self.days).unwrap_or(NaiveDate::MAX)
    }

    pub(crate) fn set_start(&mut self, start: NaiveDate) -> Result<(), ValidationError> {
        span_end(start, self.days)?;
        self.start = start;
        Ok(())
    }

    pub(crate) fn set_days(&mut self, days: u32) -> Result<(), ValidationError> {
        span_end(self.start, days)?;
        self.days = days;
        Ok(())
    }
}

/// Last day of a `days`-long block starting on `start`.
///
/// # Errors
///
/// Returns `ValidationError::InvalidDays` when `days` is zero or the end date
/// does not fit in the calendar.
pub fn span_end(start: NaiveDate, days: u32) -> Result<NaiveDate, ValidationError> {
    let last_offset = days
        .checked_sub(1)
        .ok_or(ValidationError::InvalidDays(0))?;
    start
        .checked_add_days(Days::new(u64::from(last_offset)))
        .ok_or(ValidationError::InvalidDays(i64::from(days)))
}

/// Validate a user-supplied day count.
///
/// # Errors
///
/// Returns `ValidationError::InvalidDays` when `days < 1` or it does not fit in `u32`.
pub fn validate_days(days: i64) -> Result<u32, ValidationError> {
    if days < 1 {
        return Err(ValidationError::InvalidDays(days));
    }
    u32::try_from(days).map_err(|_| ValidationError::InvalidDays(days))
}

#[derive(Deserialize)]
struct RawPlanEntry {
    id: PlanEntryId,
    name: String,
    #[serde(rename = "topic_idx", default)]
    topic_index: Option<usize>,
    start: NaiveDate,
    days: i64,
}

impl TryFrom<RawPlanEntry> for PlanEntry {
    type Error = ValidationError;

    fn try_from(raw: RawPlanEntry) -> Result<Self, Self::Error> {
        let days = validate_days(raw.days)?;
        PlanEntry::new(raw.id, raw.name, raw.topic_index, raw.start, days)
    }
}

/// Direction for swapping a plan entry with its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}
