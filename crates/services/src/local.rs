use async_trait::async_trait;
use storage::repository::Storage;
use study_core::catalog::default_plan;
use study_core::model::{Catalog, ChecklistItemKey, PlanEntry, ScoreDraft};
use study_core::planner::Planner;
use tracing::instrument;

use crate::backend::{
    DashboardBackend, DeleteScoreRequest, PlannerReorderRequest, PlannerUpdateRequest,
    ProgressSnapshot, ToggleRequest, ToggleResponse, WeeklyUpdateRequest,
};
use crate::error::ServiceError;

/// Serves the dashboard contract straight from `Storage`.
#[derive(Clone)]
pub struct LocalBackend {
    storage: Storage,
    catalog: Catalog,
    cascade_starts: bool,
}

impl LocalBackend {
    #[must_use]
    pub fn new(storage: Storage, catalog: Catalog) -> Self {
        Self {
            storage,
            catalog,
            cascade_starts: false,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Storage::in_memory(), Catalog::cfa_level_one())
    }

    /// Open (and migrate) a `SQLite` database with the built-in syllabus.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the database cannot be opened.
    pub async fn sqlite(db_url: &str) -> Result<Self, ServiceError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(storage, Catalog::cfa_level_one()))
    }

    /// Re-chain start dates after every planner change.
    #[must_use]
    pub fn with_cascade_starts(mut self, enabled: bool) -> Self {
        self.cascade_starts = enabled;
        self
    }

    /// Write the default plan if none is stored. Returns whether it seeded.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` on storage failures.
    pub async fn seed_defaults(&self) -> Result<bool, ServiceError> {
        Ok(self.storage.planner.seed_plan_if_empty(&default_plan()).await?)
    }

    async fn load_planner(&self) -> Result<Planner, ServiceError> {
        Ok(Planner::new(self.storage.planner.list_plan().await?))
    }

    async fn store_planner(&self, mut planner: Planner) -> Result<Vec<PlanEntry>, ServiceError> {
        if self.cascade_starts {
            planner.cascade_starts()?;
        }
        self.storage.planner.replace_plan(planner.entries()).await?;
        Ok(planner.into_entries())
    }
}

#[async_trait]
impl DashboardBackend for LocalBackend {
    async fn topics(&self) -> Result<Catalog, ServiceError> {
        Ok(self.catalog.clone())
    }

    async fn progress(&self) -> Result<ProgressSnapshot, ServiceError> {
        let checklists = self.storage.checklists.load_checklists().await?;
        let weekly = self.storage.weekly.load_weekly().await?;
        Ok(ProgressSnapshot {
            checklists: checklists.to_wire(),
            weekly,
        })
    }

    async fn scores(&self) -> Result<Vec<ScoreDraft>, ServiceError> {
        Ok(self.storage.scores.list_scores().await?)
    }

    async fn planner(&self) -> Result<Vec<PlanEntry>, ServiceError> {
        Ok(self.storage.planner.list_plan().await?)
    }

    #[instrument(skip(self), fields(key = %request.key, category = %request.category))]
    async fn toggle(&self, request: &ToggleRequest) -> Result<ToggleResponse, ServiceError> {
        let key: ChecklistItemKey = request.key.parse()?;
        let value = self.storage.checklists.toggle(key, request.category).await?;
        tracing::debug!(value, "toggled checklist item");
        Ok(ToggleResponse { value })
    }

    #[instrument(skip(self, score), fields(name = %score.name))]
    async fn add_score(&self, score: &ScoreDraft) -> Result<(), ServiceError> {
        let score = score.clone().validate()?;
        self.storage.scores.append_score(&score).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_score(&self, request: &DeleteScoreRequest) -> Result<(), ServiceError> {
        if !self.storage.scores.delete_score_at(request.index).await? {
            tracing::warn!(index = request.index, "no stored score at index");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_plan(
        &self,
        request: &PlannerUpdateRequest,
    ) -> Result<Vec<PlanEntry>, ServiceError> {
        let mut planner = self.load_planner().await?;
        if let Some(days) = request.days {
            planner.update_days(request.id, days)?;
        }
        if let Some(start) = request.start {
            planner.set_start(request.id, start)?;
        }
        self.store_planner(planner).await
    }

    #[instrument(skip(self))]
    async fn reorder_plan(
        &self,
        request: &PlannerReorderRequest,
    ) -> Result<Vec<PlanEntry>, ServiceError> {
        let mut planner = self.load_planner().await?;
        planner.reorder(request.id, request.direction)?;
        self.store_planner(planner).await
    }

    #[instrument(skip(self, request), fields(week = %request.week.as_str()))]
    async fn update_weekly(&self, request: &WeeklyUpdateRequest) -> Result<(), ServiceError> {
        if let Some(hours) = request.hours_actual {
            study_core::model::validate_hours(hours)?;
        }
        self.storage
            .weekly
            .update_weekly(&request.week, request.hours_actual, request.notes.as_deref())
            .await?;
        Ok(())
    }
}
