//! Study planner engine.
//!
//! Holds the ordered plan and derives each entry's temporal status relative to
//! a date-only "today". Starts are stored per entry and are not re-derived from
//! the predecessor unless [`Planner::cascade_starts`] is called explicitly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, IndexError, ValidationError};
use crate::model::{Category, Direction, PlanEntry, PlanEntryId};
use crate::progress::{ChecklistProgress, TopicStats};
use crate::time::parse_date;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Upcoming,
    Current,
    Completed,
}

impl Phase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Phase::Upcoming => "Upcoming",
            Phase::Current => "In Progress",
            Phase::Completed => "Completed",
        }
    }
}

/// Derived temporal status of one plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanTimeline {
    pub end: NaiveDate,
    pub phase: Phase,
    pub days_remaining: u32,
    pub time_elapsed_pct: u8,
}

/// Compute phase, remaining days and elapsed share for `entry` on `today`.
///
/// The block is treated as ending at the last moment of its `end` day, so a
/// current entry always has at least one day remaining and a one-day block is
/// fully elapsed as soon as it starts.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn timeline(entry: &PlanEntry, today: NaiveDate) -> PlanTimeline {
    let start = entry.start();
    let end = entry.end();

    if today < start {
        return PlanTimeline {
            end,
            phase: Phase::Upcoming,
            days_remaining: entry.days(),
            time_elapsed_pct: 0,
        };
    }
    if today > end {
        return PlanTimeline {
            end,
            phase: Phase::Completed,
            days_remaining: 0,
            time_elapsed_pct: 100,
        };
    }

    let remaining = (end - today).num_days() + 1;
    let time_elapsed_pct = if start == end {
        100
    } else {
        let elapsed = (today - start).num_days() * SECONDS_PER_DAY;
        let span = i64::from(entry.days()) * SECONDS_PER_DAY - 1;
        (100.0 * elapsed as f64 / span as f64).round().clamp(0.0, 100.0) as u8
    };

    PlanTimeline {
        end,
        phase: Phase::Current,
        days_remaining: u32::try_from(remaining).unwrap_or(entry.days()),
        time_elapsed_pct,
    }
}

/// Per-category checklist progress for the topic a plan entry studies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicLinkage {
    pub videos: TopicStats,
    pub kaplan: TopicStats,
    pub cfai: TopicStats,
}

impl TopicLinkage {
    #[must_use]
    pub fn get(&self, category: Category) -> TopicStats {
        match category {
            Category::Videos => self.videos,
            Category::Kaplan => self.kaplan,
            Category::Cfai => self.cfai,
        }
    }
}

/// `None` for review blocks and for topic indices the catalog does not know.
#[must_use]
pub fn checklist_linkage(entry: &PlanEntry, progress: &ChecklistProgress<'_>) -> Option<TopicLinkage> {
    let topic = entry.topic_index()?;
    progress.catalog().topic(topic)?;
    Some(TopicLinkage {
        videos: progress.topic_stats(topic, Some(Category::Videos)),
        kaplan: progress.topic_stats(topic, Some(Category::Kaplan)),
        cfai: progress.topic_stats(topic, Some(Category::Cfai)),
    })
}

/// Ordered sequence of plan entries. Sequence position is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Planner {
    entries: Vec<PlanEntry>,
}

impl Planner {
    #[must_use]
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<PlanEntry> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn position(&self, id: PlanEntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: PlanEntryId) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    fn get_mut(&mut self, id: PlanEntryId) -> Result<&mut PlanEntry, IndexError> {
        self.entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(IndexError::UnknownPlanEntry(id))
    }

    /// Set an entry's duration. Other entries are not shifted.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDays` if `days < 1` or the entry would
    /// end past the last representable date, or `IndexError::UnknownPlanEntry`
    /// if no entry has `id`.
    pub fn update_days(&mut self, id: PlanEntryId, days: i64) -> Result<&[PlanEntry], Error> {
        let days = crate::model::validate_days(days)?;
        self.get_mut(id)?.set_days(days)?;
        Ok(&self.entries)
    }

    /// Parse and set an entry's start date.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDate` on an unparseable date, or
    /// `IndexError::UnknownPlanEntry` if no entry has `id`.
    pub fn update_start(&mut self, id: PlanEntryId, raw: &str) -> Result<&[PlanEntry], Error> {
        let start = parse_date(raw)?;
        self.set_start(id, start)
    }

    /// # Errors
    ///
    /// Returns `IndexError::UnknownPlanEntry` if no entry has `id`, or
    /// `ValidationError::InvalidDays` if the entry would end past the last
    /// representable date.
    pub fn set_start(&mut self, id: PlanEntryId, start: NaiveDate) -> Result<&[PlanEntry], Error> {
        self.get_mut(id)?.set_start(start)?;
        Ok(&self.entries)
    }

    /// Swap the entry with its neighbour. At a boundary this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::UnknownPlanEntry` if no entry has `id`.
    pub fn reorder(
        &mut self,
        id: PlanEntryId,
        direction: Direction,
    ) -> Result<&[PlanEntry], IndexError> {
        let idx = self.position(id).ok_or(IndexError::UnknownPlanEntry(id))?;
        match direction {
            Direction::Up if idx > 0 => self.entries.swap(idx, idx - 1),
            Direction::Down if idx + 1 < self.entries.len() => self.entries.swap(idx, idx + 1),
            _ => {}
        }
        Ok(&self.entries)
    }

    /// Re-derive every start after the first as the day after its predecessor ends.
    ///
    /// The plan is left untouched when any chained entry would fall off the calendar.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDays` naming the first entry whose
    /// chained span is not representable.
    pub fn cascade_starts(&mut self) -> Result<&[PlanEntry], ValidationError> {
        let mut chained = self.entries.clone();
        for i in 1..chained.len() {
            let overflow = ValidationError::InvalidDays(i64::from(chained[i].days()));
            let next_start = chained[i - 1].end().succ_opt().ok_or(overflow)?;
            chained[i].set_start(next_start)?;
        }
        self.entries = chained;
        Ok(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::model::{Catalog, ChecklistItemKey, ChecklistState, Topic};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: u64, topic: Option<usize>, start: NaiveDate, days: u32) -> PlanEntry {
        PlanEntry::new(PlanEntryId::new(id), format!("Entry {id}"), topic, start, days).unwrap()
    }

    fn three() -> Planner {
        Planner::new(vec![
            entry(1, Some(0), date(2026, 2, 8), 16),
            entry(2, Some(1), date(2026, 2, 24), 15),
            entry(3, None, date(2026, 3, 11), 12),
        ])
    }

    fn ids(planner: &Planner) -> Vec<u64> {
        planner.entries().iter().map(|e| e.id().value()).collect()
    }

    #[test]
    fn first_day_of_block() {
        let quant = entry(1, Some(0), date(2026, 2, 8), 16);
        let t = timeline(&quant, date(2026, 2, 8));
        assert_eq!(t.phase, Phase::Current);
        assert_eq!(t.days_remaining, 16);
        assert_eq!(t.time_elapsed_pct, 0);
        assert_eq!(t.end, date(2026, 2, 23));
    }

    #[test]
    fn day_after_end_is_completed() {
        let quant = entry(1, Some(0), date(2026, 2, 8), 16);
        let t = timeline(&quant, date(2026, 2, 24));
        assert_eq!(t.phase, Phase::Completed);
        assert_eq!(t.days_remaining, 0);
        assert_eq!(t.time_elapsed_pct, 100);
    }

    #[test]
    fn last_day_is_still_current() {
        let quant = entry(1, Some(0), date(2026, 2, 8), 16);
        let t = timeline(&quant, date(2026, 2, 23));
        assert_eq!(t.phase, Phase::Current);
        assert_eq!(t.days_remaining, 1);
        assert_eq!(t.time_elapsed_pct, 94);
    }

    #[test]
    fn upcoming_reports_full_duration() {
        let quant = entry(1, Some(0), date(2026, 2, 8), 16);
        let t = timeline(&quant, date(2026, 1, 1));
        assert_eq!(t.phase, Phase::Upcoming);
        assert_eq!(t.days_remaining, 16);
        assert_eq!(t.time_elapsed_pct, 0);
    }

    #[test]
    fn single_day_block_is_fully_elapsed_once_started() {
        let mock = entry(9, None, date(2026, 8, 1), 1);
        let t = timeline(&mock, date(2026, 8, 1));
        assert_eq!(t.phase, Phase::Current);
        assert_eq!(t.days_remaining, 1);
        assert_eq!(t.time_elapsed_pct, 100);
    }

    #[test]
    fn remaining_is_zero_exactly_when_completed() {
        let quant = entry(1, Some(0), date(2026, 2, 8), 3);
        let mut day = date(2026, 2, 5);
        while day < date(2026, 2, 15) {
            let t = timeline(&quant, day);
            assert_eq!(t.days_remaining == 0, t.phase == Phase::Completed, "on {day}");
            day += Duration::days(1);
        }
    }

    #[test]
    fn update_days_does_not_shift_neighbours() {
        let mut planner = three();
        planner.update_days(PlanEntryId::new(1), 20).unwrap();
        assert_eq!(planner.entries()[0].days(), 20);
        assert_eq!(planner.entries()[1].start(), date(2026, 2, 24));
    }

    #[test]
    fn update_days_rejects_non_positive() {
        let mut planner = three();
        let before = planner.clone();
        let err = planner.update_days(PlanEntryId::new(1), 0).unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::InvalidDays(0)));
        assert_eq!(planner, before);
    }

    #[test]
    fn update_start_parses_or_fails() {
        let mut planner = three();
        planner.update_start(PlanEntryId::new(1), "2026-02-01").unwrap();
        assert_eq!(planner.entries()[0].start(), date(2026, 2, 1));

        let err = planner.update_start(PlanEntryId::new(1), "02/01/2026").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidDate(_))));

        let err = planner.update_start(PlanEntryId::new(42), "2026-02-01").unwrap_err();
        assert_eq!(err, Error::Index(IndexError::UnknownPlanEntry(PlanEntryId::new(42))));
    }

    #[test]
    fn reorder_swaps_and_is_noop_at_boundaries() {
        let mut planner = three();
        planner.reorder(PlanEntryId::new(1), Direction::Up).unwrap();
        assert_eq!(ids(&planner), vec![1, 2, 3]);

        planner.reorder(PlanEntryId::new(2), Direction::Up).unwrap();
        assert_eq!(ids(&planner), vec![2, 1, 3]);

        planner.reorder(PlanEntryId::new(2), Direction::Down).unwrap();
        assert_eq!(ids(&planner), vec![1, 2, 3]);

        planner.reorder(PlanEntryId::new(3), Direction::Down).unwrap();
        assert_eq!(ids(&planner), vec![1, 2, 3]);

        assert!(planner.reorder(PlanEntryId::new(99), Direction::Up).is_err());
    }

    #[test]
    fn cascade_chains_starts_after_predecessor() {
        let mut planner = three();
        planner.update_days(PlanEntryId::new(1), 10).unwrap();
        planner.cascade_starts().unwrap();
        assert_eq!(planner.entries()[0].start(), date(2026, 2, 8));
        assert_eq!(planner.entries()[1].start(), date(2026, 2, 18));
        assert_eq!(planner.entries()[2].start(), date(2026, 3, 5));
        assert_eq!(planner.entries()[2].end(), date(2026, 3, 16));
    }

    #[test]
    fn update_days_rejects_spans_past_the_calendar() {
        let mut planner = three();
        let before = planner.clone();
        let err = planner.update_days(PlanEntryId::new(1), 4_000_000_000).unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::InvalidDays(4_000_000_000)));
        assert_eq!(planner, before);

        let t = timeline(&planner.entries()[0], date(2026, 2, 8));
        assert_eq!(t.days_remaining, 16);
    }

    #[test]
    fn set_start_rejects_spans_past_the_calendar() {
        let mut planner = three();
        let before = planner.clone();
        let err = planner.set_start(PlanEntryId::new(1), NaiveDate::MAX).unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::InvalidDays(16)));
        assert_eq!(planner, before);
    }

    #[test]
    fn cascade_past_the_calendar_leaves_plan_untouched() {
        let mut planner = Planner::new(vec![
            entry(1, Some(0), NaiveDate::MAX, 1),
            entry(2, Some(1), date(2026, 2, 24), 15),
        ]);
        let before = planner.clone();
        let err = planner.cascade_starts().unwrap_err();
        assert_eq!(err, ValidationError::InvalidDays(15));
        assert_eq!(planner, before);
    }

    #[test]
    fn linkage_is_none_for_review_blocks() {
        let catalog = Catalog::new(vec![
            Topic::new("Quant", ["Rates", "TVM"]).with_prerequisites(["Prerequisites"]),
        ]);
        let mut state = ChecklistState::new();
        state.set(ChecklistItemKey::reading(0, 0), Category::Cfai, true);
        let progress = ChecklistProgress::new(&catalog, &state);

        let quant = entry(1, Some(0), date(2026, 2, 8), 16);
        let linkage = checklist_linkage(&quant, &progress).unwrap();
        assert_eq!(linkage.videos, TopicStats { done: 0, total: 3 });
        assert_eq!(linkage.cfai, TopicStats { done: 1, total: 2 });

        let review = entry(2, None, date(2026, 7, 23), 30);
        assert!(checklist_linkage(&review, &progress).is_none());

        let dangling = entry(3, Some(12), date(2026, 7, 23), 30);
        assert!(checklist_linkage(&dangling, &progress).is_none());
    }
}
