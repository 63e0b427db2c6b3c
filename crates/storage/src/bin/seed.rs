use std::fmt;

use chrono::{Duration, NaiveDate};
use storage::repository::Storage;
use study_core::catalog::default_plan;
use study_core::model::ScoreDraft;
use study_core::time::parse_date;

const DEFAULT_DB_URL: &str = "sqlite:progress.sqlite3?mode=rwc";

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    scores: u32,
    reset_plan: bool,
    today: Option<NaiveDate>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidScores { raw: String },
    InvalidDbUrl { raw: String },
    InvalidToday { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidScores { raw } => write!(f, "invalid --scores value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidToday { raw } => {
                write!(f, "invalid --today value (expected YYYY-MM-DD): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("STUDY_DB_URL").unwrap_or_else(|_| DEFAULT_DB_URL.into());
        let mut scores = std::env::var("STUDY_SEED_SCORES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0);
        let mut reset_plan = false;
        let mut today = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--scores" => {
                    let value = require_value(&mut args, "--scores")?;
                    scores = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidScores { raw: value.clone() })?;
                }
                "--today" => {
                    let value = require_value(&mut args, "--today")?;
                    let parsed = parse_date(&value)
                        .map_err(|_| ArgsError::InvalidToday { raw: value.clone() })?;
                    today = Some(parsed);
                }
                "--reset-plan" => reset_plan = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            scores,
            reset_plan,
            today,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: {DEFAULT_DB_URL})");
    eprintln!("  --scores <n>              Number of demo mock exams to append (default: 0)");
    eprintln!("  --today <YYYY-MM-DD>      Fixed date used to stamp demo mock exams");
    eprintln!("  --reset-plan              Overwrite the stored plan with the default schedule");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  STUDY_DB_URL, STUDY_SEED_SCORES");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let plan = default_plan();

    let plan_written = if args.reset_plan {
        storage.planner.replace_plan(&plan).await?;
        true
    } else {
        storage.planner.seed_plan_if_empty(&plan).await?
    };

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    for i in 0..args.scores {
        let weeks_ago = i64::from(args.scores - i) * 7;
        let score = 58.0 + f64::from(i % 5) * 4.5;
        let draft = ScoreDraft::new(format!("Mock {}", i + 1), score)
            .with_date(today - Duration::days(weeks_ago))
            .validate()?;
        storage.scores.append_score(&draft).await?;
    }

    println!(
        "Seeded {} into {} ({} demo scores)",
        if plan_written {
            "the default plan"
        } else {
            "nothing new for the plan"
        },
        args.db_url,
        args.scores
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storage=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
