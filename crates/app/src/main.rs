//! study-dashboard: progress, planner and mock-exam tracking from the terminal.

use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use services::config::parse_flag;
use services::DashboardConfig;
use study_core::model::{Category, Direction, PlanEntryId};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "study-dashboard", version, about = "Exam study progress dashboard")]
struct Cli {
    /// SQLite URL [env: STUDY_DB_URL]
    #[arg(long, global = true)]
    db: Option<String>,

    /// Use a remote dashboard API instead of the local database [env: STUDY_API_URL]
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Exam date for the countdown, YYYY-MM-DD [env: STUDY_EXAM_DATE]
    #[arg(long, global = true)]
    exam_date: Option<NaiveDate>,

    /// Re-chain start dates after planner edits (true/false) [env: STUDY_CASCADE_STARTS]
    #[arg(long, global = true, value_parser = parse_switch)]
    cascade_starts: Option<bool>,

    /// Track weekly hours (true/false) [env: STUDY_TRACK_WEEKLY]
    #[arg(long, global = true, value_parser = parse_switch)]
    track_weekly: Option<bool>,

    /// Pretend today is this date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall progress ring, per-topic status and exam countdown
    Dashboard,

    /// Checklist items for one category
    Checklist {
        /// videos, kaplan or cfai
        #[arg(long, default_value = "videos")]
        category: Category,
    },

    /// Flip one checklist item
    Toggle {
        /// Item key, e.g. 0_3 or 0_prereq_1
        key: String,
        /// videos, kaplan or cfai
        category: Category,
    },

    /// Planner cards with timeline and checklist linkage
    Planner,

    /// Set the number of study days for a plan entry
    PlanDays {
        id: PlanEntryId,
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },

    /// Set the start date of a plan entry
    PlanStart { id: PlanEntryId, start: String },

    /// Move a plan entry up or down
    PlanMove { id: PlanEntryId, direction: Direction },

    /// Mock-exam history and chart series
    Scores,

    /// Record a mock exam
    ScoreAdd {
        name: String,
        #[arg(allow_negative_numbers = true)]
        score: f64,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Delete a mock exam by its row index
    ScoreRm { index: usize },

    /// Show the weekly hours log, or update one week
    Weekly {
        week: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Create tables and write the default plan if none exists
    Seed,
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    parse_flag(raw).ok_or_else(|| format!("expected true or false, got {raw}"))
}

impl Cli {
    /// Environment first, flags on top.
    fn config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::from_env();
        if let Some(db) = &self.db {
            config.db_url.clone_from(db);
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = Some(api_url.clone());
        }
        if let Some(exam_date) = self.exam_date {
            config.exam_date = Some(exam_date);
        }
        if let Some(cascade) = self.cascade_starts {
            config.cascade_starts = cascade;
        }
        if let Some(track) = self.track_weekly {
            config.track_weekly = track;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "study_dashboard=info,services=info,storage=info",
                )
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let output = if cli.json {
        render::Output::Json
    } else {
        render::Output::Table
    };

    let result = commands::execute(cli.command, &config, cli.today, output).await;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
