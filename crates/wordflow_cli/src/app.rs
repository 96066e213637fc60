use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use wordflow_core::db::open_db;
use wordflow_core::{
    init_logging, ReviewService, SqliteStatsRepository, SqliteTermRepository,
    SqliteUserRepository, StatsService, TermService, TrainerConfig, UserId, UserService,
};

/// Shared state for CLI commands: one open database plus the loaded config.
pub struct App {
    pub config: TrainerConfig,
    conn: Connection,
    now: NaiveDateTime,
}

impl App {
    pub fn new(db: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => TrainerConfig::load(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            None => TrainerConfig::default(),
        };

        if let Some(dir) = config.logging.dir.as_deref() {
            init_logging(&config.logging.level, dir).context("Failed to start logging")?;
        }

        let db_path: PathBuf = db
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.storage.database_path.clone());
        let conn = open_db(&db_path)
            .with_context(|| format!("Failed to open database '{}'", db_path.display()))?;

        Ok(Self {
            config,
            conn,
            now: chrono::Local::now().naive_local(),
        })
    }

    /// Wall-clock time captured once per invocation.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn users(&self) -> Result<UserService<SqliteUserRepository<'_>>> {
        Ok(UserService::new(SqliteUserRepository::try_new(&self.conn)?))
    }

    pub fn terms(&self) -> Result<TermService<SqliteTermRepository<'_>>> {
        Ok(TermService::new(SqliteTermRepository::try_new(&self.conn)?))
    }

    pub fn reviews(&self) -> Result<ReviewService<SqliteTermRepository<'_>>> {
        Ok(ReviewService::new(
            SqliteTermRepository::try_new(&self.conn)?,
            self.config.stage_table().clone(),
        ))
    }

    pub fn stats(&self) -> Result<StatsService<SqliteStatsRepository<'_>>> {
        Ok(StatsService::new(
            SqliteStatsRepository::try_new(&self.conn)?,
            self.config.stage_table().clone(),
        ))
    }

    /// Resolves the acting user from `--user`.
    pub fn require_user(&self, email: Option<&str>) -> Result<UserId> {
        let Some(email) = email else {
            bail!("No user given. Pass --user <email> or set WORDFLOW_USER.");
        };
        match self.users()?.find_by_email(email)? {
            Some(user) => Ok(user.uuid),
            None => bail!("No user registered as '{}'. Run `wordflow user add` first.", email),
        }
    }
}
