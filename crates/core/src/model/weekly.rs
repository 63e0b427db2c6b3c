use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque, non-empty key identifying a study week (e.g. `"1"` or `"2026-W07"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(String);

impl WeekKey {
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyWeekKey` if the key is empty after trimming.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyWeekKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.0
    }
}

/// Actual study hours and free-form notes for one week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    #[serde(default)]
    pub hours_actual: f64,
    #[serde(default)]
    pub notes: String,
}

/// Sparse week → hours log. Entries are created on first update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyLog {
    entries: BTreeMap<WeekKey, WeeklyEntry>,
}

impl WeeklyLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, week: &WeekKey) -> Option<&WeeklyEntry> {
        self.entries.get(week)
    }

    /// Apply a partial update; fields left as `None` keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidHours` for negative or non-finite hours.
    /// The log is unchanged on error.
    pub fn update(
        &mut self,
        week: WeekKey,
        hours_actual: Option<f64>,
        notes: Option<String>,
    ) -> Result<&WeeklyEntry, ValidationError> {
        if let Some(hours) = hours_actual {
            validate_hours(hours)?;
        }
        let entry = self.entries.entry(week).or_default();
        if let Some(hours) = hours_actual {
            entry.hours_actual = hours;
        }
        if let Some(notes) = notes {
            entry.notes = notes.trim().to_string();
        }
        Ok(entry)
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.entries.values().map(|e| e.hours_actual).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weeks in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&WeekKey, &WeeklyEntry)> {
        self.entries.iter()
    }
}

impl FromIterator<(WeekKey, WeeklyEntry)> for WeeklyLog {
    fn from_iter<I: IntoIterator<Item = (WeekKey, WeeklyEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// # Errors
///
/// Returns `ValidationError::InvalidHours` for negative or non-finite hours.
pub fn validate_hours(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(ValidationError::InvalidHours(hours));
    }
    Ok(())
}
