use anyhow::Result;

use wordflow_core::{NewTerm, Term, TermListQuery, UserId};

use crate::app::App;
use crate::commands::print_json;
use crate::OutputFormat;

pub struct AddArgs {
    pub source: String,
    pub translation: String,
    pub example: Option<String>,
    pub tags: Option<String>,
    pub star: bool,
}

pub fn run_add(app: &App, user: UserId, args: AddArgs, format: &OutputFormat) -> Result<()> {
    let input = NewTerm {
        source: args.source,
        translation: args.translation,
        example: args.example,
        tags: args
            .tags
            .map(|csv| csv.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
        starred: args.star,
    };
    let term = app.terms()?.create_term(user, input, app.now())?;

    match format {
        OutputFormat::Json => print_json(&term)?,
        OutputFormat::Plain => println!("Added {} ({})", term.source, term.uuid),
    }
    Ok(())
}

pub fn run_list(
    app: &App,
    user: UserId,
    query: TermListQuery,
    format: &OutputFormat,
) -> Result<()> {
    let result = app.terms()?.list_terms(user, query)?;

    match format {
        OutputFormat::Json => print_json(&result.items)?,
        OutputFormat::Plain => {
            if result.items.is_empty() {
                println!("No terms found.");
                return Ok(());
            }
            print_term_table(&result.items);
            println!("\n{} terms (limit {})", result.items.len(), result.applied_limit);
        }
    }
    Ok(())
}

/// Aligned plain-text table shared by `list` and `due`.
pub(crate) fn print_term_table(terms: &[Term]) {
    let source_w = terms
        .iter()
        .map(|term| term.source.chars().count())
        .max()
        .unwrap_or(6)
        .clamp(6, 30);

    println!(
        "{:<36} {:<source_w$} {:<5} {:<10} Tags",
        "Id", "Source", "Stage", "Due"
    );
    for term in terms {
        let star = if term.starred { "*" } else { "" };
        println!(
            "{:<36} {:<source_w$} {:<5} {:<10} {}{}",
            term.uuid,
            term.source,
            term.stage,
            term.next_review,
            term.tags.to_csv(),
            star
        );
    }
}
