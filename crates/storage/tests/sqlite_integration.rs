use storage::repository::{
    ChecklistRepository, PlannerRepository, ScoreRepository, Storage, WeeklyRepository,
};
use storage::sqlite::SqliteRepository;
use study_core::catalog::default_plan;
use study_core::model::{Category, ChecklistItemKey, Direction, ScoreDraft, WeekKey};
use study_core::planner::Planner;
use study_core::time::fixed_today;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn checklist_toggle_creates_then_flips() {
    let repo = connect("memdb_checklist").await;
    let reading = ChecklistItemKey::reading(2, 4);
    let prereq = ChecklistItemKey::prerequisite(0, 0);

    assert!(repo.toggle(reading, Category::Kaplan).await.unwrap());
    assert!(repo.toggle(prereq, Category::Videos).await.unwrap());
    assert!(!repo.toggle(reading, Category::Kaplan).await.unwrap());
    assert!(repo.toggle(reading, Category::Cfai).await.unwrap());

    let state = repo.load_checklists().await.unwrap();
    assert!(!state.is_done(&reading, Category::Kaplan));
    assert!(state.is_done(&reading, Category::Cfai));
    assert!(state.is_done(&prereq, Category::Videos));
    assert!(!state.is_done(&ChecklistItemKey::reading(9, 0), Category::Videos));
}

#[tokio::test]
async fn plan_is_seeded_once_and_keeps_order() {
    let repo = connect("memdb_plan").await;
    let plan = default_plan();

    assert!(repo.seed_plan_if_empty(&plan).await.unwrap());
    assert!(!repo.seed_plan_if_empty(&plan).await.unwrap());

    let stored = repo.list_plan().await.unwrap();
    assert_eq!(stored, plan);
    assert!(stored.last().unwrap().is_review());
}

#[tokio::test]
async fn replace_plan_persists_reorder_and_days() {
    let repo = connect("memdb_plan_replace").await;
    repo.seed_plan_if_empty(&default_plan()).await.unwrap();

    let mut planner = Planner::new(repo.list_plan().await.unwrap());
    let second = planner.entries()[1].id();
    planner.reorder(second, Direction::Up).unwrap();
    planner.update_days(second, 20).unwrap();
    repo.replace_plan(planner.entries()).await.unwrap();

    let stored = repo.list_plan().await.unwrap();
    assert_eq!(stored[0].id(), second);
    assert_eq!(stored[0].days(), 20);
    assert_eq!(stored.len(), 11);
}

#[tokio::test]
async fn scores_keep_insertion_order_and_delete_by_index() {
    let repo = connect("memdb_scores").await;
    let first = ScoreDraft::new("Mock A", 65.0).with_date(fixed_today());
    let second = ScoreDraft::new("Mock B", 74.5).with_notes("timed");
    let third = ScoreDraft::new("Mock C", 81.0);
    for draft in [&first, &second, &third] {
        repo.append_score(draft).await.unwrap();
    }

    assert!(!repo.delete_score_at(5).await.unwrap());
    assert!(repo.delete_score_at(1).await.unwrap());

    let stored = repo.list_scores().await.unwrap();
    assert_eq!(stored, vec![first, third]);
}

#[tokio::test]
async fn weekly_updates_are_partial() {
    let repo = connect("memdb_weekly").await;
    let week = WeekKey::new("12").unwrap();

    let entry = repo.update_weekly(&week, Some(9.5), None).await.unwrap();
    assert!((entry.hours_actual - 9.5).abs() < f64::EPSILON);
    assert_eq!(entry.notes, "");

    let entry = repo
        .update_weekly(&week, None, Some("  quant heavy "))
        .await
        .unwrap();
    assert!((entry.hours_actual - 9.5).abs() < f64::EPSILON);
    assert_eq!(entry.notes, "quant heavy");

    assert!(repo.update_weekly(&week, Some(-1.0), None).await.is_err());

    let log = repo.load_weekly().await.unwrap();
    assert_eq!(log.len(), 1);
    assert!((log.get(&week).unwrap().hours_actual - 9.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn storage_sqlite_runs_migrations_twice() {
    let url = "sqlite:file:memdb_storage?mode=memory&cache=shared";
    let storage = Storage::sqlite(url).await.expect("first open");
    let again = Storage::sqlite(url).await.expect("second open");

    storage
        .scores
        .append_score(&ScoreDraft::new("Mock 1", 70.0))
        .await
        .unwrap();
    assert_eq!(again.scores.list_scores().await.unwrap().len(), 1);
}
