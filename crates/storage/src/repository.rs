use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use study_core::model::{
    Category, ChecklistItemKey, ChecklistState, PlanEntry, ScoreDraft, WeekKey, WeeklyEntry,
    WeeklyLog,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Checklist completion flags keyed by `(item, category)`.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Load every stored flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read or decoded.
    async fn load_checklists(&self) -> Result<ChecklistState, StorageError>;

    /// Flip one flag and return the stored result.
    ///
    /// A flag that was never written becomes `true`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn toggle(&self, key: ChecklistItemKey, category: Category)
    -> Result<bool, StorageError>;
}

/// Ordered study plan.
#[async_trait]
pub trait PlannerRepository: Send + Sync {
    /// Entries in display order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read or decoded.
    async fn list_plan(&self) -> Result<Vec<PlanEntry>, StorageError>;

    /// Persist the full sequence; positions follow slice order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn replace_plan(&self, entries: &[PlanEntry]) -> Result<(), StorageError>;

    /// Insert `entries` only when no plan exists yet. Returns whether it seeded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the check or write fails.
    async fn seed_plan_if_empty(&self, entries: &[PlanEntry]) -> Result<bool, StorageError>;
}

/// Append-ordered practice-exam attempts.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Attempts in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read or decoded.
    async fn list_scores(&self) -> Result<Vec<ScoreDraft>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn append_score(&self, score: &ScoreDraft) -> Result<(), StorageError>;

    /// Delete the attempt at `index`. Out of range is a no-op returning `false`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn delete_score_at(&self, index: usize) -> Result<bool, StorageError>;
}

/// Weekly hours log.
#[async_trait]
pub trait WeeklyRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read or decoded.
    async fn load_weekly(&self) -> Result<WeeklyLog, StorageError>;

    /// Apply a partial update, creating the week on first write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn update_weekly(
        &self,
        week: &WeekKey,
        hours_actual: Option<f64>,
        notes: Option<&str>,
    ) -> Result<WeeklyEntry, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    checklists: Arc<Mutex<ChecklistState>>,
    plan: Arc<Mutex<Vec<PlanEntry>>>,
    scores: Arc<Mutex<Vec<ScoreDraft>>>,
    weekly: Arc<Mutex<WeeklyLog>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ChecklistRepository for InMemoryRepository {
    async fn load_checklists(&self) -> Result<ChecklistState, StorageError> {
        let guard = self.checklists.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn toggle(
        &self,
        key: ChecklistItemKey,
        category: Category,
    ) -> Result<bool, StorageError> {
        let mut guard = self.checklists.lock().map_err(poisoned)?;
        Ok(guard.toggle(key, category))
    }
}

#[async_trait]
impl PlannerRepository for InMemoryRepository {
    async fn list_plan(&self) -> Result<Vec<PlanEntry>, StorageError> {
        let guard = self.plan.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn replace_plan(&self, entries: &[PlanEntry]) -> Result<(), StorageError> {
        let mut guard = self.plan.lock().map_err(poisoned)?;
        *guard = entries.to_vec();
        Ok(())
    }

    async fn seed_plan_if_empty(&self, entries: &[PlanEntry]) -> Result<bool, StorageError> {
        let mut guard = self.plan.lock().map_err(poisoned)?;
        if !guard.is_empty() {
            return Ok(false);
        }
        *guard = entries.to_vec();
        Ok(true)
    }
}

#[async_trait]
impl ScoreRepository for InMemoryRepository {
    async fn list_scores(&self) -> Result<Vec<ScoreDraft>, StorageError> {
        let guard = self.scores.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn append_score(&self, score: &ScoreDraft) -> Result<(), StorageError> {
        let mut guard = self.scores.lock().map_err(poisoned)?;
        guard.push(score.clone());
        Ok(())
    }

    async fn delete_score_at(&self, index: usize) -> Result<bool, StorageError> {
        let mut guard = self.scores.lock().map_err(poisoned)?;
        if index >= guard.len() {
            return Ok(false);
        }
        guard.remove(index);
        Ok(true)
    }
}

#[async_trait]
impl WeeklyRepository for InMemoryRepository {
    async fn load_weekly(&self) -> Result<WeeklyLog, StorageError> {
        let guard = self.weekly.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn update_weekly(
        &self,
        week: &WeekKey,
        hours_actual: Option<f64>,
        notes: Option<&str>,
    ) -> Result<WeeklyEntry, StorageError> {
        let mut guard = self.weekly.lock().map_err(poisoned)?;
        guard
            .update(week.clone(), hours_actual, notes.map(str::to_owned))
            .cloned()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub checklists: Arc<dyn ChecklistRepository>,
    pub planner: Arc<dyn PlannerRepository>,
    pub scores: Arc<dyn ScoreRepository>,
    pub weekly: Arc<dyn WeeklyRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Use one repository value for every concern.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: ChecklistRepository
            + PlannerRepository
            + ScoreRepository
            + WeeklyRepository
            + Clone
            + 'static,
    {
        let checklists: Arc<dyn ChecklistRepository> = Arc::new(repo.clone());
        let planner: Arc<dyn PlannerRepository> = Arc::new(repo.clone());
        let scores: Arc<dyn ScoreRepository> = Arc::new(repo.clone());
        let weekly: Arc<dyn WeeklyRepository> = Arc::new(repo);
        Self {
            checklists,
            planner,
            scores,
            weekly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::catalog::default_plan;

    #[tokio::test]
    async fn toggle_reports_stored_value() {
        let repo = InMemoryRepository::new();
        let key = ChecklistItemKey::reading(0, 0);

        assert!(repo.toggle(key, Category::Videos).await.unwrap());
        assert!(!repo.toggle(key, Category::Videos).await.unwrap());
        assert!(repo.toggle(key, Category::Cfai).await.unwrap());

        let state = repo.load_checklists().await.unwrap();
        assert!(!state.is_done(&key, Category::Videos));
        assert!(state.is_done(&key, Category::Cfai));
    }

    #[tokio::test]
    async fn seeding_only_happens_once() {
        let repo = InMemoryRepository::new();
        let plan = default_plan();
        assert!(repo.seed_plan_if_empty(&plan).await.unwrap());
        assert!(!repo.seed_plan_if_empty(&plan[..1]).await.unwrap());
        assert_eq!(repo.list_plan().await.unwrap().len(), plan.len());
    }

    #[tokio::test]
    async fn delete_out_of_range_is_noop() {
        let repo = InMemoryRepository::new();
        repo.append_score(&ScoreDraft::new("Mock 1", 72.0))
            .await
            .unwrap();
        assert!(!repo.delete_score_at(3).await.unwrap());
        assert!(repo.delete_score_at(0).await.unwrap());
        assert!(repo.list_scores().await.unwrap().is_empty());
    }
}
