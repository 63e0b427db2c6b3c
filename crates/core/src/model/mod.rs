mod checklist;
mod ids;
mod plan;
mod score;
mod topic;
mod weekly;

pub use checklist::{Category, ChecklistEntry, ChecklistItemKey, ChecklistState, ItemSlot};
pub use ids::{ParseIdError, PlanEntryId, ScoreId};
pub use plan::{Direction, PlanEntry, span_end, validate_days};
pub use score::{PASS_THRESHOLD, ScoreDraft, ScoreRecord, Verdict};
pub use topic::{Catalog, Topic};
pub use weekly::{WeekKey, WeeklyEntry, WeeklyLog, validate_hours};
