//! Core engine for the WordFlow vocabulary trainer.
//!
//! Owns the spaced-repetition rules (`schedule`), the statistics engine
//! (`stats`), the SQLite term store (`db`, `repo`) and the use-case services a
//! serving layer calls (`service`).

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod stats;

pub use config::{ConfigError, TrainerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::review::{InvalidOutcome, ReviewEvent, ReviewId, ReviewOutcome};
pub use model::tags::TagSet;
pub use model::term::{Term, TermId, TermValidationError};
pub use model::user::{User, UserId};
pub use repo::stats_repo::{SqliteStatsRepository, StatsRepository};
pub use repo::term_repo::{
    AppliedReview, SqliteTermRepository, TermListQuery, TermRepository, TermScheduleUpdate,
};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use schedule::mastery::stamp_mastery;
pub use schedule::scheduler::{advance, Advance};
pub use schedule::stage_table::{StageTable, StageTableError};
pub use schedule::ScheduleError;
pub use service::review_service::{ReviewService, ReviewServiceError};
pub use service::stats_service::{StatsService, StatsServiceError};
pub use service::term_service::{NewTerm, TermPatch, TermService, TermServiceError, TermsListResult};
pub use service::user_service::{UserService, UserServiceError};
pub use stats::leaderboard::{mask_email, LeaderboardEntry};
pub use stats::series::ActivitySeries;
pub use stats::snapshot::StatsSnapshot;
pub use stats::window::{LeaderboardRange, SeriesRange};
pub use stats::StatsError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
