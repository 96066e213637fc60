//! Statistics use-case service.
//!
//! # Responsibility
//! - Per-user counters snapshot, activity series and the global leaderboard.
//!
//! # Invariants
//! - Ranges are validated before any query runs.
//! - Every counter of one response is computed against the same `now`.

use crate::model::user::UserId;
use crate::repo::stats_repo::StatsRepository;
use crate::repo::RepoError;
use crate::schedule::stage_table::StageTable;
use crate::stats::leaderboard::{normalize_leaderboard_limit, LeaderboardEntry};
use crate::stats::series::{ActivitySeries, BucketPlan};
use crate::stats::snapshot::StatsSnapshot;
use crate::stats::window::{window_start, LeaderboardRange, SeriesRange, SNAPSHOT_WINDOWS_DAYS};
use crate::stats::StatsError;
use chrono::{Days, NaiveDateTime, NaiveTime};
use log::debug;
use thiserror::Error;

/// Horizon of the "due soon" counter.
const DUE_SOON_DAYS: u64 = 7;

#[derive(Debug, Error)]
pub enum StatsServiceError {
    #[error(transparent)]
    InvalidRange(#[from] StatsError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct StatsService<R: StatsRepository> {
    repo: R,
    table: StageTable,
}

impl<R: StatsRepository> StatsService<R> {
    pub fn new(repo: R, table: StageTable) -> Self {
        Self { repo, table }
    }

    /// Counters for `user` as seen at `now`.
    pub fn snapshot(
        &self,
        user: UserId,
        now: NaiveDateTime,
    ) -> Result<StatsSnapshot, StatsServiceError> {
        let today = now.date();
        let start_of_today = today.and_time(NaiveTime::MIN);
        let due_soon_until = today
            .checked_add_days(Days::new(DUE_SOON_DAYS))
            .unwrap_or(today);
        let starts = SNAPSHOT_WINDOWS_DAYS.map(|days| window_start(now, days));

        let snapshot = StatsSnapshot {
            due_today: self.repo.count_due(user, today)?,
            reviewed_today: self.repo.count_reviews_since(user, start_of_today)?,
            due_next_7d: self.repo.count_due_between(user, today, due_soon_until)?,
            ..StatsSnapshot::default()
        }
        .with_new_terms(self.repo.count_terms_created_in_windows(user, starts)?)
        .with_reviews(self.repo.count_reviews_in_windows(user, starts)?);

        debug!(
            "event=stats_snapshot module=stats status=ok user_id={} due_today={} reviewed_today={}",
            user, snapshot.due_today, snapshot.reviewed_today
        );
        Ok(snapshot)
    }

    /// Activity chart for a range given as `1d|7d|30d|365d`.
    ///
    /// # Errors
    /// - `InvalidRange` for any other value; no query runs.
    pub fn series(
        &self,
        user: UserId,
        range: &str,
        now: NaiveDateTime,
    ) -> Result<ActivitySeries, StatsServiceError> {
        let range: SeriesRange = range.parse()?;
        self.series_for(user, range, now)
    }

    pub fn series_for(
        &self,
        user: UserId,
        range: SeriesRange,
        now: NaiveDateTime,
    ) -> Result<ActivitySeries, StatsServiceError> {
        let plan = BucketPlan::for_range(range, now);
        let created = self.repo.term_created_times(user, plan.start(), plan.end())?;
        let reviewed = self.repo.review_times(user, plan.start(), plan.end())?;

        Ok(ActivitySeries {
            range,
            labels: plan.labels(),
            new_terms: plan.count(created),
            reviews: plan.count(reviewed),
        })
    }

    /// Learned-words ranking for a range given as `7d|30d|365d|all`.
    ///
    /// Limit defaults to 10 and is clamped to `[1, 50]`.
    pub fn leaderboard(
        &self,
        range: &str,
        limit: Option<u32>,
        now: NaiveDateTime,
    ) -> Result<Vec<LeaderboardEntry>, StatsServiceError> {
        let range: LeaderboardRange = range.parse()?;
        self.leaderboard_for(range, limit, now)
    }

    pub fn leaderboard_for(
        &self,
        range: LeaderboardRange,
        limit: Option<u32>,
        now: NaiveDateTime,
    ) -> Result<Vec<LeaderboardEntry>, StatsServiceError> {
        let limit = normalize_leaderboard_limit(limit);
        let rows = self.repo.leaderboard_rows(
            self.table.max_stage(),
            range.mastered_window(now),
            limit,
        )?;
        debug!(
            "event=leaderboard module=stats status=ok range={} limit={} rows={}",
            range,
            limit,
            rows.len()
        );
        Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
    }
}
