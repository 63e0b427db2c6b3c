//! Command layer between the presentation and a `DashboardBackend`.
//!
//! Every mutation runs in two phases: local validation first (nothing is sent
//! when it fails), then the backend request. `AppState` is only written after
//! the backend answers successfully, so a failed request leaves it untouched.

use std::sync::Arc;

use chrono::NaiveDate;
use study_core::model::{
    Category, ChecklistItemKey, Direction, PlanEntryId, ScoreDraft, ScoreId, ScoreRecord,
    WeekKey, WeeklyEntry, validate_days, validate_hours,
};
use study_core::planner::Planner;
use study_core::time::parse_date;
use study_core::{Clock, IndexError};

use crate::backend::{
    DashboardBackend, DeleteScoreRequest, PlannerReorderRequest, PlannerUpdateRequest,
    ToggleRequest, WeeklyUpdateRequest,
};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::views::{self, ChecklistView, DashboardView, PlanCardView, ScoresView, WeeklyView};

/// A toggle that has been validated but not yet confirmed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub key: ChecklistItemKey,
    pub category: Category,
    /// Value to show while the request is in flight.
    pub optimistic: bool,
}

#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    backend: Arc<dyn DashboardBackend>,
    exam_date: Option<NaiveDate>,
    track_weekly: bool,
}

impl DashboardService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn DashboardBackend>) -> Self {
        Self {
            clock,
            backend,
            exam_date: study_core::catalog::default_exam_date(),
            track_weekly: true,
        }
    }

    #[must_use]
    pub fn with_exam_date(mut self, exam_date: Option<NaiveDate>) -> Self {
        self.exam_date = exam_date;
        self
    }

    #[must_use]
    pub fn with_weekly_tracking(mut self, enabled: bool) -> Self {
        self.track_weekly = enabled;
        self
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Fetch topics, progress, scores and plan into a fresh state.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if any of the loads fail.
    pub async fn load(&self) -> Result<AppState, ServiceError> {
        let catalog = self.backend.topics().await?;
        let progress = self.backend.progress().await?;
        let scores = self.backend.scores().await?;
        let plan = self.backend.planner().await?;
        tracing::debug!(
            topics = catalog.len(),
            scores = scores.len(),
            plan = plan.len(),
            "loaded dashboard state"
        );
        Ok(AppState::from_parts(catalog, progress, scores, plan))
    }

    // ─── Checklist ──────────────────────────────────────────────────────

    /// Validate a toggle and compute the value to show until it is confirmed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if `raw_key` is not a checklist key.
    pub fn begin_toggle(
        &self,
        state: &AppState,
        raw_key: &str,
        category: Category,
    ) -> Result<PendingToggle, ServiceError> {
        let key = raw_key.parse::<ChecklistItemKey>().inspect_err(|err| {
            tracing::warn!(raw_key, %err, "rejected toggle");
        })?;
        Ok(PendingToggle {
            key,
            category,
            optimistic: !state.checklists.is_done(&key, category),
        })
    }

    /// Send the toggle and commit the backend's value.
    ///
    /// The committed value is whatever the backend reports, even if it
    /// contradicts `pending.optimistic`.
    ///
    /// # Errors
    ///
    /// Returns the backend error; `state` is left as it was.
    pub async fn complete_toggle(
        &self,
        state: &mut AppState,
        pending: PendingToggle,
    ) -> Result<bool, ServiceError> {
        let request = ToggleRequest {
            key: pending.key.to_string(),
            category: pending.category,
        };
        let response = self
            .backend
            .toggle(&request)
            .await
            .inspect_err(|err| warn_failed("toggle", err))?;

        if response.value != pending.optimistic {
            tracing::debug!(key = %pending.key, "toggle reconciled against backend value");
        }
        state
            .checklists
            .set(pending.key, pending.category, response.value);
        Ok(response.value)
    }

    /// `begin_toggle` followed by `complete_toggle`.
    ///
    /// # Errors
    ///
    /// See `begin_toggle` and `complete_toggle`.
    pub async fn toggle(
        &self,
        state: &mut AppState,
        raw_key: &str,
        category: Category,
    ) -> Result<bool, ServiceError> {
        let pending = self.begin_toggle(state, raw_key, category)?;
        self.complete_toggle(state, pending).await
    }

    // ─── Planner ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for `days < 1`, `ServiceError::Index`
    /// for an unknown id, or the backend error. State is unchanged on error.
    pub async fn update_plan_days(
        &self,
        state: &mut AppState,
        id: PlanEntryId,
        days: i64,
    ) -> Result<(), ServiceError> {
        validate_days(days).inspect_err(|err| tracing::warn!(%id, %err, "rejected days"))?;
        require_entry(state, id)?;
        self.send_plan_update(state, PlannerUpdateRequest::days(id, days))
            .await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for an unparseable date,
    /// `ServiceError::Index` for an unknown id, or the backend error.
    pub async fn update_plan_start(
        &self,
        state: &mut AppState,
        id: PlanEntryId,
        raw_start: &str,
    ) -> Result<(), ServiceError> {
        let start =
            parse_date(raw_start).inspect_err(|err| tracing::warn!(%id, %err, "rejected start"))?;
        require_entry(state, id)?;
        self.send_plan_update(state, PlannerUpdateRequest::start(id, start))
            .await
    }

    /// Move an entry one slot. At either end this is a no-op that still round-trips.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Index` for an unknown id, or the backend error.
    pub async fn reorder_plan(
        &self,
        state: &mut AppState,
        id: PlanEntryId,
        direction: Direction,
    ) -> Result<(), ServiceError> {
        require_entry(state, id)?;
        let entries = self
            .backend
            .reorder_plan(&PlannerReorderRequest { id, direction })
            .await
            .inspect_err(|err| warn_failed("planner/reorder", err))?;
        state.planner = Planner::new(entries);
        Ok(())
    }

    async fn send_plan_update(
        &self,
        state: &mut AppState,
        request: PlannerUpdateRequest,
    ) -> Result<(), ServiceError> {
        let entries = self
            .backend
            .update_plan(&request)
            .await
            .inspect_err(|err| warn_failed("planner/update", err))?;
        state.planner = Planner::new(entries);
        Ok(())
    }

    // ─── Scores ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for an empty name or bad score, or the
    /// backend error. The ledger is unchanged on error.
    pub async fn add_score(
        &self,
        state: &mut AppState,
        draft: ScoreDraft,
    ) -> Result<ScoreRecord, ServiceError> {
        let draft = draft
            .validate()
            .inspect_err(|err| tracing::warn!(%err, "rejected score"))?;
        self.backend
            .add_score(&draft)
            .await
            .inspect_err(|err| warn_failed("scores", err))?;
        Ok(state.ledger.add(draft)?.clone())
    }

    /// Delete by position, the only identity the wire contract knows.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Index` if `index` is out of bounds, or the backend error.
    pub async fn delete_score(
        &self,
        state: &mut AppState,
        index: usize,
    ) -> Result<ScoreRecord, ServiceError> {
        let len = state.ledger.len();
        if index >= len {
            let err = IndexError::ScoreOutOfBounds { index, len };
            tracing::warn!(%err, "rejected score delete");
            return Err(err.into());
        }
        self.backend
            .delete_score(&DeleteScoreRequest { index })
            .await
            .inspect_err(|err| warn_failed("scores/delete", err))?;
        Ok(state.ledger.remove(index)?)
    }

    /// Resolve the session id to its current position, then delete.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Index` for an unknown id, or the backend error.
    pub async fn delete_score_by_id(
        &self,
        state: &mut AppState,
        id: ScoreId,
    ) -> Result<ScoreRecord, ServiceError> {
        let index = state
            .ledger
            .index_of(id)
            .ok_or(IndexError::UnknownScore(id))?;
        self.delete_score(state, index).await
    }

    // ─── Weekly ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ServiceError::WeeklyDisabled` when tracking is off,
    /// `ServiceError::Validation` for an empty week or bad hours, or the backend error.
    pub async fn update_weekly(
        &self,
        state: &mut AppState,
        week: &str,
        hours_actual: Option<f64>,
        notes: Option<String>,
    ) -> Result<WeeklyEntry, ServiceError> {
        if !self.track_weekly {
            return Err(ServiceError::WeeklyDisabled);
        }
        let week = WeekKey::new(week)?;
        if let Some(hours) = hours_actual {
            validate_hours(hours)?;
        }
        let request = WeeklyUpdateRequest {
            week,
            hours_actual,
            notes,
        };
        self.backend
            .update_weekly(&request)
            .await
            .inspect_err(|err| warn_failed("weekly/update", err))?;

        let entry = state
            .weekly
            .update(request.week, request.hours_actual, request.notes)?;
        Ok(entry.clone())
    }

    // ─── Views ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn dashboard_view(&self, state: &AppState) -> DashboardView {
        views::dashboard(state, self.today(), self.exam_date, self.track_weekly)
    }

    #[must_use]
    pub fn checklist_view(&self, state: &AppState) -> ChecklistView {
        views::checklist(state, state.active_category)
    }

    #[must_use]
    pub fn planner_view(&self, state: &AppState) -> Vec<PlanCardView> {
        views::planner(state, self.today())
    }

    #[must_use]
    pub fn scores_view(&self, state: &AppState) -> ScoresView {
        views::scores(state)
    }

    /// `None` when weekly tracking is off.
    #[must_use]
    pub fn weekly_view(&self, state: &AppState) -> Option<WeeklyView> {
        self.track_weekly.then(|| views::weekly(state))
    }
}

fn require_entry(state: &AppState, id: PlanEntryId) -> Result<(), ServiceError> {
    if state.planner.get(id).is_none() {
        let err = IndexError::UnknownPlanEntry(id);
        tracing::warn!(%err, "rejected planner command");
        return Err(err.into());
    }
    Ok(())
}

fn warn_failed(endpoint: &'static str, err: &ServiceError) {
    tracing::warn!(endpoint, %err, "dashboard request failed; state left unchanged");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalBackend;
    use study_core::time::fixed_clock;

    async fn service() -> (DashboardService, AppState) {
        let backend = LocalBackend::in_memory();
        backend.seed_defaults().await.unwrap();
        let service = DashboardService::new(fixed_clock(), Arc::new(backend));
        let state = service.load().await.unwrap();
        (service, state)
    }

    #[tokio::test]
    async fn toggle_twice_restores_value() {
        let (service, mut state) = service().await;

        let pending = service
            .begin_toggle(&state, "0_0", Category::Videos)
            .unwrap();
        assert!(pending.optimistic);
        assert!(service.complete_toggle(&mut state, pending).await.unwrap());
        assert!(!service.toggle(&mut state, "0_0", Category::Videos).await.unwrap());
        assert!(
            !state
                .checklists
                .is_done(&ChecklistItemKey::reading(0, 0), Category::Videos)
        );
    }

    #[tokio::test]
    async fn bad_key_never_reaches_backend() {
        let (service, state) = service().await;
        let err = service
            .begin_toggle(&state, "0_x", Category::Cfai)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn plan_days_validated_before_request() {
        let (service, mut state) = service().await;
        let id = state.planner.entries()[0].id();
        let before = state.planner.clone();

        assert!(matches!(
            service.update_plan_days(&mut state, id, 0).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service
                .update_plan_days(&mut state, PlanEntryId::new(404), 5)
                .await,
            Err(ServiceError::Index(_))
        ));
        assert_eq!(state.planner, before);

        service.update_plan_days(&mut state, id, 21).await.unwrap();
        assert_eq!(state.planner.entries()[0].days(), 21);
    }

    #[tokio::test]
    async fn first_entry_start_moves() {
        let (service, mut state) = service().await;
        let id = state.planner.entries()[0].id();
        service
            .update_plan_start(&mut state, id, "2026-02-10")
            .await
            .unwrap();
        assert_eq!(
            state.planner.entries()[0].start(),
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
        );
        assert!(matches!(
            service.update_plan_start(&mut state, id, "10/02/2026").await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn reorder_round_trip() {
        let (service, mut state) = service().await;
        let original = state.planner.clone();
        let second = original.entries()[1].id();

        service
            .reorder_plan(&mut state, second, Direction::Up)
            .await
            .unwrap();
        assert_eq!(state.planner.entries()[0].id(), second);
        service
            .reorder_plan(&mut state, second, Direction::Down)
            .await
            .unwrap();
        assert_eq!(state.planner, original);
    }

    #[tokio::test]
    async fn add_then_remove_score() {
        let (service, mut state) = service().await;
        let record = service
            .add_score(&mut state, ScoreDraft::new("Mock 1", 72.0))
            .await
            .unwrap();
        assert!(record.verdict().is_pass());

        let err = service.delete_score(&mut state, 3).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Index(IndexError::ScoreOutOfBounds { index: 3, len: 1 })
        ));

        service.delete_score_by_id(&mut state, record.id()).await.unwrap();
        assert!(state.ledger.is_empty());
        assert!(service.scores_view(&state).chart.is_empty());
    }

    #[tokio::test]
    async fn weekly_respects_flag() {
        let (service, mut state) = service().await;
        let entry = service
            .update_weekly(&mut state, "1", Some(12.0), Some("solid".into()))
            .await
            .unwrap();
        assert_eq!(entry.notes, "solid");

        let off = service.clone().with_weekly_tracking(false);
        assert!(matches!(
            off.update_weekly(&mut state, "2", Some(1.0), None).await,
            Err(ServiceError::WeeklyDisabled)
        ));
        assert!(off.weekly_view(&state).is_none());
        assert_eq!(service.weekly_view(&state).unwrap().rows.len(), 1);
    }
}
