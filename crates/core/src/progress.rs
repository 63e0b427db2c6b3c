//! Checklist progress engine.
//!
//! Turns the sparse [`ChecklistState`] into completion statistics against the
//! [`Catalog`]. Everything here is a pure read; mutation lives on the state.

use serde::Serialize;

use crate::model::{Catalog, Category, ChecklistItemKey, ChecklistState, ItemSlot};

/// `round(done / total * 100)`, or 0 when there is nothing to do.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicStats {
    pub done: usize,
    pub total: usize,
}

impl TopicStats {
    #[must_use]
    pub fn percent(&self) -> u8 {
        percent(self.done, self.total)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub videos: usize,
    pub kaplan: usize,
    pub cfai: usize,
}

impl CategoryCounts {
    #[must_use]
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Videos => self.videos,
            Category::Kaplan => self.kaplan,
            Category::Cfai => self.cfai,
        }
    }

    fn bump(&mut self, category: Category) {
        match category {
            Category::Videos => self.videos += 1,
            Category::Kaplan => self.kaplan += 1,
            Category::Cfai => self.cfai += 1,
        }
    }

    #[must_use]
    pub fn sum(&self) -> usize {
        self.videos + self.kaplan + self.cfai
    }
}

/// Syllabus-wide completion. Prerequisites are excluded from both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStats {
    pub done: usize,
    pub total: usize,
    /// Number of readings, i.e. the denominator of each category.
    pub readings: usize,
    pub per_category: CategoryCounts,
}

impl GlobalStats {
    #[must_use]
    pub fn percent(&self) -> u8 {
        percent(self.done, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TopicStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl TopicStatus {
    #[must_use]
    pub fn from_percent(pct: u8) -> Self {
        match pct {
            0 => TopicStatus::NotStarted,
            100.. => TopicStatus::Complete,
            _ => TopicStatus::InProgress,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TopicStatus::NotStarted => "Not Started",
            TopicStatus::InProgress => "In Progress",
            TopicStatus::Complete => "Complete",
        }
    }
}

/// Read-only view pairing a catalog with checklist state.
#[derive(Debug, Clone, Copy)]
pub struct ChecklistProgress<'a> {
    catalog: &'a Catalog,
    state: &'a ChecklistState,
}

impl<'a> ChecklistProgress<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, state: &'a ChecklistState) -> Self {
        Self { catalog, state }
    }

    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Completion for one topic.
    ///
    /// With a category, the total is the reading count, plus the prerequisites
    /// when the category is `Videos`. Without one, done is summed over all three
    /// categories against `readings * 3`. Unknown topics yield `{0, 0}`.
    #[must_use]
    pub fn topic_stats(&self, topic_index: usize, category: Option<Category>) -> TopicStats {
        let Some(topic) = self.catalog.topic(topic_index) else {
            return TopicStats::default();
        };
        let readings = topic.reading_count();

        match category {
            Some(category) => {
                let mut done = (0..readings)
                    .filter(|r| {
                        self.state
                            .is_done(&ChecklistItemKey::reading(topic_index, *r), category)
                    })
                    .count();
                let mut total = readings;
                if category == Category::Videos {
                    let prereqs = topic.prerequisite_count();
                    total += prereqs;
                    done += (0..prereqs)
                        .filter(|p| {
                            self.state.is_done(
                                &ChecklistItemKey::prerequisite(topic_index, *p),
                                category,
                            )
                        })
                        .count();
                }
                TopicStats { done, total }
            }
            None => {
                let done = (0..readings)
                    .map(|r| {
                        self.state
                            .get(&ChecklistItemKey::reading(topic_index, r))
                            .done_count()
                    })
                    .sum();
                TopicStats {
                    done,
                    total: readings * Category::ALL.len(),
                }
            }
        }
    }

    /// Completion across the whole syllabus for the overall ring and legend.
    ///
    /// Only keys that resolve to a reading in the current catalog are counted.
    #[must_use]
    pub fn global_stats(&self) -> GlobalStats {
        let mut per_category = CategoryCounts::default();
        for (key, entry) in self.state.iter() {
            if !matches!(key.slot(), ItemSlot::Reading(_)) || !self.catalog.resolves(key) {
                continue;
            }
            for category in Category::ALL {
                if entry.get(category) {
                    per_category.bump(category);
                }
            }
        }
        let readings = self.catalog.total_readings();
        GlobalStats {
            done: per_category.sum(),
            total: readings * Category::ALL.len(),
            readings,
            per_category,
        }
    }

    #[must_use]
    pub fn status_of(&self, topic_index: usize) -> TopicStatus {
        TopicStatus::from_percent(self.topic_stats(topic_index, None).percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Topic;

    fn two_by_two() -> Catalog {
        Catalog::new(vec![
            Topic::new("Quant", ["Rates", "TVM"]),
            Topic::new("Econ", ["Firms", "Cycles"]),
        ])
    }

    #[test]
    fn empty_state_is_zero_of_twelve() {
        let catalog = two_by_two();
        let state = ChecklistState::new();
        let stats = ChecklistProgress::new(&catalog, &state).global_stats();
        assert_eq!((stats.done, stats.total), (0, 12));
        assert_eq!(stats.percent(), 0);
    }

    #[test]
    fn one_toggle_is_eight_percent() {
        let catalog = two_by_two();
        let mut state = ChecklistState::new();
        state.toggle(ChecklistItemKey::reading(0, 0), Category::Videos);

        let stats = ChecklistProgress::new(&catalog, &state).global_stats();
        assert_eq!((stats.done, stats.total), (1, 12));
        assert_eq!(stats.percent(), 8);
        assert_eq!(stats.per_category.videos, 1);
    }

    #[test]
    fn empty_topic_is_not_started() {
        let catalog = Catalog::new(vec![Topic::new("Empty", Vec::<String>::new())]);
        let state = ChecklistState::new();
        let progress = ChecklistProgress::new(&catalog, &state);
        assert_eq!(progress.topic_stats(0, None), TopicStats { done: 0, total: 0 });
        assert_eq!(
            progress.topic_stats(0, Some(Category::Videos)),
            TopicStats { done: 0, total: 0 }
        );
        assert_eq!(progress.status_of(0), TopicStatus::NotStarted);
    }

    #[test]
    fn prerequisites_count_for_videos_only() {
        let catalog = Catalog::new(vec![
            Topic::new("Quant", ["Rates", "TVM"]).with_prerequisites(["Prerequisites"]),
        ]);
        let mut state = ChecklistState::new();
        state.set(ChecklistItemKey::prerequisite(0, 0), Category::Videos, true);
        state.set(ChecklistItemKey::reading(0, 1), Category::Kaplan, true);

        let progress = ChecklistProgress::new(&catalog, &state);
        assert_eq!(
            progress.topic_stats(0, Some(Category::Videos)),
            TopicStats { done: 1, total: 3 }
        );
        assert_eq!(
            progress.topic_stats(0, Some(Category::Kaplan)),
            TopicStats { done: 1, total: 2 }
        );

        let global = progress.global_stats();
        assert_eq!(global.total, 6);
        assert_eq!(global.done, 1);
    }

    #[test]
    fn stale_keys_are_ignored() {
        let catalog = two_by_two();
        let mut state = ChecklistState::new();
        state.set(ChecklistItemKey::reading(7, 0), Category::Cfai, true);
        state.set(ChecklistItemKey::reading(0, 9), Category::Cfai, true);

        let stats = ChecklistProgress::new(&catalog, &state).global_stats();
        assert_eq!(stats.done, 0);
    }

    #[test]
    fn status_follows_percentage() {
        let catalog = Catalog::new(vec![Topic::new("Ethics", ["Code"])]);
        let mut state = ChecklistState::new();
        let key = ChecklistItemKey::reading(0, 0);
        let status = |s: &ChecklistState| ChecklistProgress::new(&catalog, s).status_of(0);

        assert_eq!(status(&state), TopicStatus::NotStarted);
        state.set(key, Category::Videos, true);
        assert_eq!(status(&state), TopicStatus::InProgress);
        state.set(key, Category::Kaplan, true);
        state.set(key, Category::Cfai, true);
        assert_eq!(status(&state), TopicStatus::Complete);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(3, 3), 100);
    }
}
