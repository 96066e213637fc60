use anyhow::Result;

use wordflow_core::UserId;

use crate::app::App;
use crate::commands::print_json;
use crate::OutputFormat;

pub fn run_snapshot(app: &App, user: UserId, format: &OutputFormat) -> Result<()> {
    let snapshot = app.stats()?.snapshot(user, app.now())?;

    match format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Plain => {
            println!("Due today:      {}", snapshot.due_today);
            println!("Reviewed today: {}", snapshot.reviewed_today);
            println!("Due next 7d:    {}", snapshot.due_next_7d);
            println!();
            println!("{:<8} {:>6} {:>8}", "Window", "New", "Reviews");
            for (label, new, reviews) in [
                ("1d", snapshot.new_1d, snapshot.reviews_1d),
                ("7d", snapshot.new_7d, snapshot.reviews_7d),
                ("30d", snapshot.new_30d, snapshot.reviews_30d),
                ("365d", snapshot.new_365d, snapshot.reviews_365d),
            ] {
                println!("{label:<8} {new:>6} {reviews:>8}");
            }
        }
    }
    Ok(())
}

pub fn run_series(app: &App, user: UserId, range: &str, format: &OutputFormat) -> Result<()> {
    let series = app.stats()?.series(user, range, app.now())?;

    match format {
        OutputFormat::Json => print_json(&series)?,
        OutputFormat::Plain => {
            println!("{:<6} {:>6} {:>8}", "When", "New", "Reviews");
            for ((label, new), reviews) in series
                .labels
                .iter()
                .zip(&series.new_terms)
                .zip(&series.reviews)
            {
                println!("{label:<6} {new:>6} {reviews:>8}");
            }
        }
    }
    Ok(())
}

pub fn run_leaderboard(
    app: &App,
    range: &str,
    limit: Option<u32>,
    format: &OutputFormat,
) -> Result<()> {
    let limit = limit.unwrap_or(app.config.leaderboard.default_limit);
    let entries = app.stats()?.leaderboard(range, Some(limit), app.now())?;

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("No learners yet.");
                return Ok(());
            }
            for (rank, entry) in entries.iter().enumerate() {
                println!("{:>3}. {:<32} {}", rank + 1, entry.user, entry.learned_words);
            }
        }
    }
    Ok(())
}
