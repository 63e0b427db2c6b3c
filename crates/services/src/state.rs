use study_core::ledger::ScoreLedger;
use study_core::model::{Catalog, Category, ChecklistState, PlanEntry, ScoreDraft, WeeklyLog};
use study_core::planner::Planner;
use study_core::progress::ChecklistProgress;

use crate::backend::ProgressSnapshot;

/// Everything the dashboard renders from, owned by the presentation layer and
/// passed into each command.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub catalog: Catalog,
    pub checklists: ChecklistState,
    pub weekly: WeeklyLog,
    pub ledger: ScoreLedger,
    pub planner: Planner,
    /// Category shown in the checklist tab.
    pub active_category: Category,
}

impl AppState {
    /// Assemble state from the four load responses.
    ///
    /// Checklist keys that do not parse are dropped with a warning.
    #[must_use]
    pub fn from_parts(
        catalog: Catalog,
        progress: ProgressSnapshot,
        scores: Vec<ScoreDraft>,
        plan: Vec<PlanEntry>,
    ) -> Self {
        let (checklists, rejected) = ChecklistState::from_wire(progress.checklists);
        if !rejected.is_empty() {
            tracing::warn!(?rejected, "dropped unreadable checklist keys");
        }
        Self {
            catalog,
            checklists,
            weekly: progress.weekly,
            ledger: ScoreLedger::from_drafts(scores),
            planner: Planner::new(plan),
            active_category: Category::default(),
        }
    }

    #[must_use]
    pub fn progress(&self) -> ChecklistProgress<'_> {
        ChecklistProgress::new(&self.catalog, &self.checklists)
    }
}
