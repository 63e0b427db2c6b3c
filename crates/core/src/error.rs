use thiserror::Error;

use crate::model::{PlanEntryId, ScoreId};

/// Bad user input. The operation is aborted and no state changes.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("study days must be at least 1, got {0}")]
    InvalidDays(i64),

    #[error("invalid date (expected YYYY-MM-DD): {0:?}")]
    InvalidDate(String),

    #[error("exam name cannot be empty")]
    EmptyScoreName,

    #[error("score must be a finite number")]
    NonFiniteScore,

    #[error("score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(f64),

    #[error("unknown checklist category: {0:?}")]
    UnknownCategory(String),

    #[error("invalid checklist key: {0:?}")]
    InvalidItemKey(String),

    #[error("week key cannot be empty")]
    EmptyWeekKey,

    #[error("hours must be a finite, non-negative number, got {0}")]
    InvalidHours(f64),
}

/// A reference to an entry that does not exist.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IndexError {
    #[error("no plan entry with id {0}")]
    UnknownPlanEntry(PlanEntryId),

    #[error("score index {index} out of bounds (len {len})")]
    ScoreOutOfBounds { index: usize, len: usize },

    #[error("no score with id {0}")]
    UnknownScore(ScoreId),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Index(#[from] IndexError),
}
