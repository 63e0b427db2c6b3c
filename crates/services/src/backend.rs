//! The persistence contract the dashboard talks to.
//!
//! Request and response shapes mirror the JSON bodies of the dashboard API so
//! the same types serve the local and the HTTP backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use study_core::model::{
    Catalog, Category, ChecklistEntry, Direction, PlanEntry, PlanEntryId, ScoreDraft, WeekKey,
    WeeklyLog,
};

use crate::error::ServiceError;

/// Stored progress as returned by `GET progress`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub checklists: HashMap<String, ChecklistEntry>,
    #[serde(default)]
    pub weekly: WeeklyLog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub key: String,
    #[serde(rename = "cat")]
    pub category: Category,
}

/// Authoritative value after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteScoreRequest {
    pub index: usize,
}

/// Either field may be omitted. `days` is left raw so the backend can reject it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerUpdateRequest {
    pub id: PlanEntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
}

impl PlannerUpdateRequest {
    #[must_use]
    pub fn days(id: PlanEntryId, days: i64) -> Self {
        Self {
            id,
            days: Some(days),
            start: None,
        }
    }

    #[must_use]
    pub fn start(id: PlanEntryId, start: NaiveDate) -> Self {
        Self {
            id,
            days: None,
            start: Some(start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerReorderRequest {
    pub id: PlanEntryId,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyUpdateRequest {
    #[serde(rename = "wk")]
    pub week: WeekKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_actual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One method per dashboard endpoint.
///
/// Mutations that return `()` only acknowledge; the caller's local state is
/// authoritative for them. Planner mutations return the full updated sequence.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` when the backend cannot be reached.
    async fn topics(&self) -> Result<Catalog, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Transport` when the backend cannot be reached.
    async fn progress(&self) -> Result<ProgressSnapshot, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Transport` when the backend cannot be reached.
    async fn scores(&self) -> Result<Vec<ScoreDraft>, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Transport` when the backend cannot be reached.
    async fn planner(&self) -> Result<Vec<PlanEntry>, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for an unreadable key, or
    /// `ServiceError::Transport` when the write fails.
    async fn toggle(&self, request: &ToggleRequest) -> Result<ToggleResponse, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a rejected draft, or
    /// `ServiceError::Transport` when the write fails.
    async fn add_score(&self, score: &ScoreDraft) -> Result<(), ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Transport` when the write fails.
    async fn delete_score(&self, request: &DeleteScoreRequest) -> Result<(), ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` or `ServiceError::Index` when the
    /// planner rejects the change, or `ServiceError::Transport`.
    async fn update_plan(
        &self,
        request: &PlannerUpdateRequest,
    ) -> Result<Vec<PlanEntry>, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Index` for an unknown id, or `ServiceError::Transport`.
    async fn reorder_plan(
        &self,
        request: &PlannerReorderRequest,
    ) -> Result<Vec<PlanEntry>, ServiceError>;

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for bad hours, or `ServiceError::Transport`.
    async fn update_weekly(&self, request: &WeeklyUpdateRequest) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggle_request_uses_cat_field() {
        let request = ToggleRequest {
            key: "3_1".into(),
            category: Category::Kaplan,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"key": "3_1", "cat": "kaplan"})
        );
    }

    #[test]
    fn planner_update_omits_missing_fields() {
        let request = PlannerUpdateRequest::days(PlanEntryId::new(4), 12);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": 4, "days": 12})
        );

        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let request = PlannerUpdateRequest::start(PlanEntryId::new(1), start);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"id": 1, "start": "2026-03-01"})
        );
    }

    #[test]
    fn progress_snapshot_tolerates_missing_weekly() {
        let snapshot: ProgressSnapshot =
            serde_json::from_value(json!({"checklists": {"0_0": {"videos": true}}})).unwrap();
        assert!(snapshot.weekly.is_empty());
        assert!(snapshot.checklists["0_0"].videos);
        assert!(!snapshot.checklists["0_0"].cfai);
    }

    #[test]
    fn weekly_update_uses_wk_field() {
        let request = WeeklyUpdateRequest {
            week: WeekKey::new("5").unwrap(),
            hours_actual: Some(7.5),
            notes: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"wk": "5", "hours_actual": 7.5})
        );
    }
}
