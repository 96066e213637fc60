use anyhow::Result;
use log::info;

use wordflow_core::{TermId, UserId};

use crate::app::App;
use crate::commands::print_json;
use crate::commands::terms::print_term_table;
use crate::OutputFormat;

pub fn run_due(
    app: &App,
    user: UserId,
    limit: Option<u32>,
    format: &OutputFormat,
) -> Result<()> {
    let limit = limit.unwrap_or(app.config.review.due_limit);
    let terms = app
        .reviews()?
        .due_terms(user, app.now().date(), Some(limit))?;

    match format {
        OutputFormat::Json => print_json(&terms)?,
        OutputFormat::Plain => {
            if terms.is_empty() {
                println!("Nothing due today.");
                return Ok(());
            }
            print_term_table(&terms);
        }
    }
    Ok(())
}

pub fn run_review(
    app: &App,
    user: UserId,
    term_id: TermId,
    outcome: &str,
    format: &OutputFormat,
) -> Result<()> {
    let term = app.reviews()?.record_review(term_id, outcome, user, app.now())?;
    info!(
        "event=cli_review module=cli status=ok term_id={} stage={}",
        term.uuid, term.stage
    );

    match format {
        OutputFormat::Json => print_json(&term)?,
        OutputFormat::Plain => println!(
            "{} -> stage {}, next review {}",
            term.source, term.stage, term.next_review
        ),
    }
    Ok(())
}
