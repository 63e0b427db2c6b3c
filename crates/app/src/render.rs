//! Terminal output for each view, as a table or as JSON.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;
use services::views::{ChecklistView, DashboardView, PlanCardView, ScoresView, WeeklyView};
use study_core::time::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn dashboard(view: &DashboardView, output: Output) -> Result<()> {
    if output == Output::Json {
        return json(view);
    }

    println!(
        "Overall: {}% ({} / {} items)",
        view.ring.percent, view.ring.done, view.ring.total
    );
    for item in &view.legend {
        println!("  {:<15} {} / {}", item.label, item.done, item.total);
    }
    if let Some(countdown) = view.countdown {
        println!(
            "Exam {}: {} days ({} weeks)",
            format_date(countdown.exam_date),
            countdown.days,
            countdown.weeks
        );
    }
    if let Some(average) = view.average_score {
        println!("Mock exams: {} taken, average {average:.1}", view.scores_taken);
    }
    if let Some(hours) = view.weekly_hours {
        println!("Logged hours: {hours:.1}");
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Topic", "Done", "Progress", "Status"]);
    for row in &view.topics {
        table.add_row(vec![
            Cell::new(row.index),
            Cell::new(&row.name),
            Cell::new(format!("{} / {}", row.done, row.total)),
            Cell::new(format!("{}%", row.percent)),
            Cell::new(row.status_label),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn checklist(view: &ChecklistView, output: Output) -> Result<()> {
    if output == Output::Json {
        return json(view);
    }

    println!("{}", view.label);
    for topic in &view.topics {
        println!(
            "\n{} ({} / {}, {}%)",
            topic.name, topic.stats.done, topic.stats.total, topic.percent
        );
        for item in &topic.items {
            let mark = if item.done { "x" } else { " " };
            let label = if item.prerequisite {
                format!("[prereq] {}", item.label)
            } else {
                item.label.clone()
            };
            println!("  [{mark}] {:<12} {label}", item.key);
        }
    }
    Ok(())
}

pub fn planner(cards: &[PlanCardView], output: Output) -> Result<()> {
    if output == Output::Json {
        return json(cards);
    }

    let mut table = Table::new();
    table.set_header(vec![
        "", "Id", "Block", "Start", "End", "Days", "Status", "Left", "Elapsed", "Checklist",
    ]);
    for card in cards {
        let linkage = card.linkage.map_or_else(String::new, |l| {
            format!(
                "V {}/{}  K {}/{}  C {}/{}",
                l.videos.done,
                l.videos.total,
                l.kaplan.done,
                l.kaplan.total,
                l.cfai.done,
                l.cfai.total
            )
        });
        table.add_row(vec![
            Cell::new(&card.badge),
            Cell::new(card.id),
            Cell::new(&card.name),
            Cell::new(&card.start_label),
            Cell::new(&card.end_label),
            Cell::new(card.days),
            Cell::new(card.phase_label),
            Cell::new(card.days_remaining),
            Cell::new(format!("{}%", card.time_elapsed_pct)),
            Cell::new(linkage),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn scores(view: &ScoresView, output: Output) -> Result<()> {
    if output == Output::Json {
        return json(view);
    }

    if view.rows.is_empty() {
        println!("No mock exams recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Date", "Score", "Result", "Notes"]);
    for row in &view.rows {
        table.add_row(vec![
            Cell::new(row.index),
            Cell::new(&row.name),
            Cell::new(row.date.map(format_date).unwrap_or_default()),
            Cell::new(format!("{:.1}%", row.score)),
            Cell::new(if row.verdict.is_pass() { "PASS" } else { "FAIL" }),
            Cell::new(row.notes.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
    if let Some(average) = view.average {
        println!("Average {average:.1}, passed {} of {}", view.passed, view.rows.len());
    }
    Ok(())
}

pub fn weekly(view: &WeeklyView, output: Output) -> Result<()> {
    if output == Output::Json {
        return json(view);
    }

    let mut table = Table::new();
    table.set_header(vec!["Week", "Hours", "Notes"]);
    for row in &view.rows {
        table.add_row(vec![
            Cell::new(row.week.as_str()),
            Cell::new(format!("{:.1}", row.hours_actual)),
            Cell::new(&row.notes),
        ]);
    }
    println!("{table}");
    println!("Total {:.1} hours", view.total_hours);
    Ok(())
}
