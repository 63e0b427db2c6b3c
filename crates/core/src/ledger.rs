//! Practice-exam score ledger.

use serde::Serialize;

use crate::error::{IndexError, ValidationError};
use crate::model::{PASS_THRESHOLD, ScoreDraft, ScoreId, ScoreRecord};

/// `true` when the attempt meets the pass threshold.
#[must_use]
pub fn pass_fail(record: &ScoreRecord) -> bool {
    record.verdict().is_pass()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub score: f64,
}

/// Line-chart input: one point per attempt plus a flat target line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub target: Vec<f64>,
}

impl ChartSeries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Append-ordered list of attempts.
///
/// Each record gets a `ScoreId` on entry that stays stable while earlier
/// records are removed; positions shift down as usual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreLedger {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

impl ScoreLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load previously persisted attempts as-is, in order.
    #[must_use]
    pub fn from_drafts(drafts: impl IntoIterator<Item = ScoreDraft>) -> Self {
        let mut ledger = Self::new();
        for draft in drafts {
            ledger.push(draft);
        }
        ledger
    }

    fn push(&mut self, draft: ScoreDraft) -> &ScoreRecord {
        self.next_id += 1;
        let index = self.records.len();
        self.records
            .push(ScoreRecord::from_draft(ScoreId::new(self.next_id), draft));
        &self.records[index]
    }

    /// Validate and append an attempt.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is empty or the score is not a
    /// finite number in 0..=100. The ledger is unchanged on error.
    pub fn add(&mut self, draft: ScoreDraft) -> Result<&ScoreRecord, ValidationError> {
        let draft = draft.validate()?;
        Ok(self.push(draft))
    }

    /// Remove by position; later attempts shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::ScoreOutOfBounds` if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<ScoreRecord, IndexError> {
        if index >= self.records.len() {
            return Err(IndexError::ScoreOutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    /// Remove by stable id, returning the position it occupied.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::UnknownScore` if no record has `id`.
    pub fn remove_by_id(&mut self, id: ScoreId) -> Result<(usize, ScoreRecord), IndexError> {
        let index = self.index_of(id).ok_or(IndexError::UnknownScore(id))?;
        Ok((index, self.records.remove(index)))
    }

    #[must_use]
    pub fn index_of(&self, id: ScoreId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScoreRecord> {
        self.records.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(ScoreRecord::score).sum();
        Some(sum / self.records.len() as f64)
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.records.iter().filter(|r| pass_fail(r)).count()
    }

    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        let points = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| ChartPoint {
                label: if r.name().is_empty() {
                    format!("Mock {}", i + 1)
                } else {
                    r.name().to_string()
                },
                score: r.score(),
            })
            .collect::<Vec<_>>();
        let target = vec![PASS_THRESHOLD; points.len()];
        ChartSeries { points, target }
    }
}
