//! Command dispatch: open a backend, load state, run one action, render.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use services::{Clock, DashboardBackend, DashboardConfig, DashboardService, HttpBackend, LocalBackend};
use study_core::model::{Category, ScoreDraft};

use crate::Commands;
use crate::render::{self, Output};

#[derive(Serialize)]
struct ToggleOutcome<'a> {
    key: &'a str,
    category: Category,
    value: bool,
}

async fn open_backend(config: &DashboardConfig) -> Result<Arc<dyn DashboardBackend>> {
    if let Some(api_url) = &config.api_url {
        tracing::info!(api_url, "using remote dashboard api");
        return Ok(Arc::new(HttpBackend::new(api_url)?));
    }

    let backend = LocalBackend::sqlite(&config.db_url)
        .await
        .with_context(|| format!("opening {}", config.db_url))?
        .with_cascade_starts(config.cascade_starts);
    if backend.seed_defaults().await? {
        tracing::info!("seeded default study plan");
    }
    Ok(Arc::new(backend))
}

pub(crate) async fn execute(
    command: Commands,
    config: &DashboardConfig,
    today: Option<NaiveDate>,
    output: Output,
) -> Result<()> {
    if let Commands::Seed = command {
        return seed(config).await;
    }

    let clock = today.map_or_else(Clock::default_clock, Clock::fixed);
    let service = DashboardService::new(clock, open_backend(config).await?)
        .with_exam_date(config.exam_date)
        .with_weekly_tracking(config.track_weekly);
    let mut state = service.load().await.context("loading dashboard")?;

    match command {
        Commands::Dashboard => render::dashboard(&service.dashboard_view(&state), output),
        Commands::Checklist { category } => {
            state.active_category = category;
            render::checklist(&service.checklist_view(&state), output)
        }
        Commands::Toggle { key, category } => {
            let value = service.toggle(&mut state, &key, category).await?;
            if output == Output::Json {
                return render::json(&ToggleOutcome {
                    key: &key,
                    category,
                    value,
                });
            }
            let mark = if value { "done" } else { "not done" };
            println!("{key} [{}]: {mark}", category.label());
            Ok(())
        }
        Commands::Planner => render::planner(&service.planner_view(&state), output),
        Commands::PlanDays { id, days } => {
            service.update_plan_days(&mut state, id, days).await?;
            render::planner(&service.planner_view(&state), output)
        }
        Commands::PlanStart { id, start } => {
            service.update_plan_start(&mut state, id, &start).await?;
            render::planner(&service.planner_view(&state), output)
        }
        Commands::PlanMove { id, direction } => {
            service.reorder_plan(&mut state, id, direction).await?;
            render::planner(&service.planner_view(&state), output)
        }
        Commands::Scores => render::scores(&service.scores_view(&state), output),
        Commands::ScoreAdd {
            name,
            score,
            date,
            notes,
        } => {
            let mut draft = ScoreDraft::new(name, score).with_notes(notes);
            draft.date = date;
            service.add_score(&mut state, draft).await?;
            render::scores(&service.scores_view(&state), output)
        }
        Commands::ScoreRm { index } => {
            service.delete_score(&mut state, index).await?;
            render::scores(&service.scores_view(&state), output)
        }
        Commands::Weekly { week, hours, notes } => {
            if let Some(week) = week {
                service
                    .update_weekly(&mut state, &week, hours, notes)
                    .await?;
            }
            let Some(view) = service.weekly_view(&state) else {
                bail!("weekly tracking is disabled");
            };
            render::weekly(&view, output)
        }
        Commands::Seed => Ok(()),
    }
}

async fn seed(config: &DashboardConfig) -> Result<()> {
    if config.api_url.is_some() {
        bail!("seed only works against a local database; unset STUDY_API_URL");
    }
    let backend = LocalBackend::sqlite(&config.db_url)
        .await
        .with_context(|| format!("opening {}", config.db_url))?;
    if backend.seed_defaults().await? {
        println!("Seeded the default plan into {}", config.db_url);
    } else {
        println!("{} already has a plan", config.db_url);
    }
    Ok(())
}
