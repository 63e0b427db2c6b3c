//! Serializable view models for each dashboard tab.
//!
//! Views are plain data computed from `AppState`; formatting beyond dates and
//! labels is left to the renderer.

use chrono::NaiveDate;
use serde::Serialize;
use study_core::countdown::Countdown;
use study_core::ledger::ChartSeries;
use study_core::model::{Category, ChecklistItemKey, PlanEntryId, ScoreId, Verdict, WeekKey};
use study_core::planner::{Phase, TopicLinkage, checklist_linkage, timeline};
use study_core::progress::{TopicStats, TopicStatus, percent};

use crate::state::AppState;

/// Date as shown on planner cards, e.g. `Sun Feb 08 2026`.
#[must_use]
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

// ─── Dashboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingView {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub category: Category,
    pub label: &'static str,
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRow {
    pub index: usize,
    pub name: String,
    pub readings: usize,
    pub prerequisites: usize,
    pub done: usize,
    pub total: usize,
    pub percent: u8,
    pub status: TopicStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub ring: RingView,
    pub legend: Vec<LegendItem>,
    pub topics: Vec<TopicRow>,
    pub countdown: Option<Countdown>,
    pub scores_taken: usize,
    pub average_score: Option<f64>,
    /// `None` when weekly tracking is off.
    pub weekly_hours: Option<f64>,
}

#[must_use]
pub fn dashboard(
    state: &AppState,
    today: NaiveDate,
    exam_date: Option<NaiveDate>,
    track_weekly: bool,
) -> DashboardView {
    let progress = state.progress();
    let global = progress.global_stats();

    let legend = Category::ALL
        .iter()
        .map(|&category| {
            let done = global.per_category.get(category);
            LegendItem {
                category,
                label: category.label(),
                done,
                total: global.readings,
                percent: percent(done, global.readings),
            }
        })
        .collect();

    let topics = state
        .catalog
        .topics()
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let stats = progress.topic_stats(index, None);
            let status = TopicStatus::from_percent(stats.percent());
            TopicRow {
                index,
                name: topic.name.clone(),
                readings: topic.reading_count(),
                prerequisites: topic.prerequisite_count(),
                done: stats.done,
                total: stats.total,
                percent: stats.percent(),
                status,
                status_label: status.label(),
            }
        })
        .collect();

    DashboardView {
        ring: RingView {
            done: global.done,
            total: global.total,
            percent: global.percent(),
        },
        legend,
        topics,
        countdown: exam_date.map(|exam| Countdown::until(exam, today)),
        scores_taken: state.ledger.len(),
        average_score: state.ledger.average(),
        weekly_hours: track_weekly.then(|| state.weekly.total_hours()),
    }
}

// ─── Checklist ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItemView {
    pub key: String,
    pub label: String,
    pub prerequisite: bool,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistTopicView {
    pub index: usize,
    pub name: String,
    pub stats: TopicStats,
    pub percent: u8,
    pub items: Vec<ChecklistItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistView {
    pub category: Category,
    pub label: &'static str,
    pub topics: Vec<ChecklistTopicView>,
}

/// Checklist tab for one category. Prerequisites only appear under videos.
#[must_use]
pub fn checklist(state: &AppState, category: Category) -> ChecklistView {
    let progress = state.progress();
    let topics = state
        .catalog
        .topics()
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let mut items = Vec::new();
            if category == Category::Videos {
                for (p, name) in topic.prerequisites.iter().enumerate() {
                    let key = ChecklistItemKey::prerequisite(index, p);
                    items.push(ChecklistItemView {
                        key: key.to_string(),
                        label: name.clone(),
                        prerequisite: true,
                        done: state.checklists.is_done(&key, category),
                    });
                }
            }
            for (r, name) in topic.readings.iter().enumerate() {
                let key = ChecklistItemKey::reading(index, r);
                items.push(ChecklistItemView {
                    key: key.to_string(),
                    label: name.clone(),
                    prerequisite: false,
                    done: state.checklists.is_done(&key, category),
                });
            }
            let stats = progress.topic_stats(index, Some(category));
            ChecklistTopicView {
                index,
                name: topic.name.clone(),
                stats,
                percent: stats.percent(),
                items,
            }
        })
        .collect();

    ChecklistView {
        category,
        label: category.label(),
        topics,
    }
}

// ─── Planner ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCardView {
    pub id: PlanEntryId,
    pub name: String,
    /// Position + 1 for topic blocks, `R` for review blocks.
    pub badge: String,
    pub topic_index: Option<usize>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_label: String,
    pub end_label: String,
    pub days: u32,
    pub phase: Phase,
    pub phase_label: &'static str,
    pub days_remaining: u32,
    pub time_elapsed_pct: u8,
    /// Only the first card's start is edited directly.
    pub start_editable: bool,
    pub can_move_up: bool,
    pub can_move_down: bool,
    pub linkage: Option<TopicLinkage>,
}

#[must_use]
pub fn planner(state: &AppState, today: NaiveDate) -> Vec<PlanCardView> {
    let progress = state.progress();
    let entries = state.planner.entries();
    let last = entries.len().saturating_sub(1);

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let tl = timeline(entry, today);
            PlanCardView {
                id: entry.id(),
                name: entry.name().to_string(),
                badge: if entry.is_review() {
                    "R".to_string()
                } else {
                    (position + 1).to_string()
                },
                topic_index: entry.topic_index(),
                start: entry.start(),
                end: tl.end,
                start_label: display_date(entry.start()),
                end_label: display_date(tl.end),
                days: entry.days(),
                phase: tl.phase,
                phase_label: tl.phase.label(),
                days_remaining: tl.days_remaining,
                time_elapsed_pct: tl.time_elapsed_pct,
                start_editable: position == 0,
                can_move_up: position > 0,
                can_move_down: position < last,
                linkage: checklist_linkage(entry, &progress),
            }
        })
        .collect()
}

// ─── Scores ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRowView {
    pub index: usize,
    pub id: ScoreId,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub score: f64,
    pub notes: Option<String>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoresView {
    pub rows: Vec<ScoreRowView>,
    pub chart: ChartSeries,
    pub average: Option<f64>,
    pub passed: usize,
}

#[must_use]
pub fn scores(state: &AppState) -> ScoresView {
    let rows = state
        .ledger
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| ScoreRowView {
            index,
            id: record.id(),
            name: record.name().to_string(),
            date: record.date(),
            score: record.score(),
            notes: record.notes().map(str::to_owned),
            verdict: record.verdict(),
        })
        .collect();

    ScoresView {
        rows,
        chart: state.ledger.chart_series(),
        average: state.ledger.average(),
        passed: state.ledger.passed_count(),
    }
}

// ─── Weekly ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRowView {
    pub week: WeekKey,
    pub hours_actual: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyView {
    pub rows: Vec<WeeklyRowView>,
    pub total_hours: f64,
}

#[must_use]
pub fn weekly(state: &AppState) -> WeeklyView {
    WeeklyView {
        rows: state
            .weekly
            .iter()
            .map(|(week, entry)| WeeklyRowView {
                week: week.clone(),
                hours_actual: entry.hours_actual,
                notes: entry.notes.clone(),
            })
            .collect(),
        total_hours: state.weekly.total_hours(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::catalog::default_plan;
    use study_core::model::{Catalog, ScoreDraft, Topic};
    use study_core::planner::Planner;
    use study_core::time::fixed_today;

    fn two_topic_state() -> AppState {
        AppState {
            catalog: Catalog::new(vec![
                Topic::new("A", ["a1", "a2"]),
                Topic::new("B", ["b1", "b2"]).with_prerequisites(["pre"]),
            ]),
            ..AppState::default()
        }
    }

    #[test]
    fn ring_moves_after_one_toggle() {
        let mut state = two_topic_state();
        let view = dashboard(&state, fixed_today(), None, true);
        assert_eq!(view.ring, RingView { done: 0, total: 12, percent: 0 });
        assert!(view.countdown.is_none());

        state
            .checklists
            .set(ChecklistItemKey::reading(0, 0), Category::Videos, true);
        let view = dashboard(&state, fixed_today(), None, true);
        assert_eq!(view.ring.percent, 8);
        assert_eq!(view.legend[0].done, 1);
        assert_eq!(view.legend[0].total, 4);
        assert_eq!(view.legend[0].percent, 25);
        assert_eq!(view.topics[0].status, TopicStatus::InProgress);
        assert_eq!(view.topics[1].status_label, "Not Started");
    }

    #[test]
    fn weekly_hours_hidden_when_disabled() {
        let state = two_topic_state();
        assert_eq!(dashboard(&state, fixed_today(), None, true).weekly_hours, Some(0.0));
        assert_eq!(dashboard(&state, fixed_today(), None, false).weekly_hours, None);
    }

    #[test]
    fn prerequisites_only_listed_for_videos() {
        let state = two_topic_state();
        let videos = checklist(&state, Category::Videos);
        assert_eq!(videos.topics[1].items.len(), 3);
        assert!(videos.topics[1].items[0].prerequisite);
        assert_eq!(videos.topics[1].items[0].key, "1_prereq_0");
        assert_eq!(videos.topics[1].stats.total, 3);

        let kaplan = checklist(&state, Category::Kaplan);
        assert_eq!(kaplan.topics[1].items.len(), 2);
        assert_eq!(kaplan.label, "Kaplan Read");
    }

    #[test]
    fn planner_cards_badge_and_edit_rules() {
        let state = AppState {
            catalog: Catalog::cfa_level_one(),
            planner: Planner::new(default_plan()),
            ..AppState::default()
        };
        let cards = planner(&state, fixed_today());
        assert_eq!(cards.len(), 11);
        assert_eq!(cards[0].badge, "1");
        assert!(cards[0].start_editable);
        assert!(!cards[0].can_move_up);
        assert!(!cards[1].start_editable);
        assert_eq!(cards[10].badge, "R");
        assert!(cards[10].linkage.is_none());
        assert!(!cards[10].can_move_down);
        assert!(cards[0].linkage.is_some());
        assert_eq!(cards[0].start_label, "Sun Feb 08 2026");
        assert_eq!(cards[0].phase, Phase::Current);
    }

    #[test]
    fn score_rows_carry_verdicts() {
        let mut state = AppState::default();
        state.ledger.add(ScoreDraft::new("Mock 1", 70.0)).unwrap();
        state.ledger.add(ScoreDraft::new("Mock 2", 69.5)).unwrap();

        let view = scores(&state);
        assert_eq!(view.rows[0].verdict, Verdict::Pass);
        assert_eq!(view.rows[1].verdict, Verdict::Fail);
        assert_eq!(view.rows[1].index, 1);
        assert_eq!(view.passed, 1);
        assert_eq!(view.chart.points.len(), 2);
        assert_eq!(view.chart.target, vec![70.0, 70.0]);
    }
}
