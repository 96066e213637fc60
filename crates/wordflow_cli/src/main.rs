mod app;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wordflow", about = "Spaced-repetition vocabulary trainer", version)]
struct Cli {
    /// SQLite database file (default: `storage.database_path` from config)
    #[arg(long, global = true, env = "WORDFLOW_DB")]
    db: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Acting user's email
    #[arg(long, global = true, env = "WORDFLOW_USER")]
    user: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// User accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Add a term
    Add {
        source: String,
        translation: String,
        /// Example sentence
        #[arg(long)]
        example: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        star: bool,
    },

    /// List terms, newest first
    List {
        /// Substring of source or translation
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        starred: bool,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Terms due for review today
    Due {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Record a review outcome (good|bad)
    Review { term: uuid::Uuid, outcome: String },

    /// Counters snapshot
    Stats,

    /// Activity chart (1d|7d|30d|365d)
    Series {
        #[arg(long, default_value = "7d")]
        range: String,
    },

    /// Learned-words ranking (7d|30d|365d|all)
    Leaderboard {
        #[arg(long, default_value = "7d")]
        range: String,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// Register a user; the first one also claims any owner-less terms
    Add { email: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = app::App::new(cli.db.as_deref(), cli.config.as_deref())?;
    let user = cli.user.as_deref();

    match cli.command {
        Command::User(UserCommand::Add { email }) => {
            commands::user::run_add(&app, &email, &cli.format)?;
        }
        Command::Add {
            source,
            translation,
            example,
            tags,
            star,
        } => {
            let user = app.require_user(user)?;
            commands::terms::run_add(
                &app,
                user,
                commands::terms::AddArgs {
                    source,
                    translation,
                    example,
                    tags,
                    star,
                },
                &cli.format,
            )?;
        }
        Command::List {
            query,
            tag,
            starred,
            limit,
            offset,
        } => {
            let user = app.require_user(user)?;
            let query = wordflow_core::TermListQuery {
                text: query,
                tag,
                starred: starred.then_some(true),
                limit,
                offset,
            };
            commands::terms::run_list(&app, user, query, &cli.format)?;
        }
        Command::Due { limit } => {
            let user = app.require_user(user)?;
            commands::review::run_due(&app, user, limit, &cli.format)?;
        }
        Command::Review { term, outcome } => {
            let user = app.require_user(user)?;
            commands::review::run_review(&app, user, term, &outcome, &cli.format)?;
        }
        Command::Stats => {
            let user = app.require_user(user)?;
            commands::stats::run_snapshot(&app, user, &cli.format)?;
        }
        Command::Series { range } => {
            let user = app.require_user(user)?;
            commands::stats::run_series(&app, user, &range, &cli.format)?;
        }
        Command::Leaderboard { range, limit } => {
            commands::stats::run_leaderboard(&app, &range, limit, &cli.format)?;
        }
    }

    Ok(())
}
