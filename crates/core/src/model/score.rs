use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ScoreId;
use crate::time::optional_date;

/// Scores at or above this value pass.
pub const PASS_THRESHOLD: f64 = 70.0;

/// Pass/fail outcome of a practice exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= PASS_THRESHOLD {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Wire shape of a practice-exam attempt, before it joins a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDraft {
    #[serde(default)]
    pub name: String,
    #[serde(with = "optional_date", default)]
    pub date: Option<NaiveDate>,
    pub score: f64,
    #[serde(default)]
    pub notes: String,
}

impl ScoreDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            date: None,
            score,
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Trim text fields and check the score.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is empty or the score is not a
    /// finite number within 0..=100.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyScoreName);
        }
        if !self.score.is_finite() {
            return Err(ValidationError::NonFiniteScore);
        }
        if !(0.0..=100.0).contains(&self.score) {
            return Err(ValidationError::ScoreOutOfRange(self.score));
        }
        Ok(Self {
            name,
            date: self.date,
            score: self.score,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// A practice-exam attempt held by a ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    id: ScoreId,
    name: String,
    #[serde(with = "optional_date")]
    date: Option<NaiveDate>,
    score: f64,
    notes: String,
}

impl ScoreRecord {
    pub(crate) fn from_draft(id: ScoreId, draft: ScoreDraft) -> Self {
        Self {
            id,
            name: draft.name,
            date: draft.date,
            score: draft.score,
            notes: draft.notes,
        }
    }

    #[must_use]
    pub fn id(&self) -> ScoreId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        if self.notes.is_empty() {
            None
        } else {
            Some(&self.notes)
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::for_score(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(Verdict::for_score(70.0), Verdict::Pass);
        assert_eq!(Verdict::for_score(69.999), Verdict::Fail);
    }

    #[test]
    fn validate_trims_and_rejects() {
        let draft = ScoreDraft::new("  Mock 1 ", 72.0).with_notes(" timed ");
        let valid = draft.validate().unwrap();
        assert_eq!(valid.name, "Mock 1");
        assert_eq!(valid.notes, "timed");

        assert_eq!(
            ScoreDraft::new("   ", 72.0).validate().unwrap_err(),
            ValidationError::EmptyScoreName
        );
        assert_eq!(
            ScoreDraft::new("Mock", f64::NAN).validate().unwrap_err(),
            ValidationError::NonFiniteScore
        );
        assert!(matches!(
            ScoreDraft::new("Mock", 101.0).validate(),
            Err(ValidationError::ScoreOutOfRange(_))
        ));
    }

    #[test]
    fn empty_wire_date_means_no_date() {
        let draft: ScoreDraft =
            serde_json::from_str(r#"{"name":"Mock 2","date":"","score":64.5,"notes":""}"#).unwrap();
        assert_eq!(draft.date, None);

        let draft: ScoreDraft =
            serde_json::from_str(r#"{"name":"Mock 3","date":"2026-05-01","score":80}"#).unwrap();
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 5, 1));
        assert_eq!(serde_json::to_value(&draft).unwrap()["date"], "2026-05-01");
    }
}
