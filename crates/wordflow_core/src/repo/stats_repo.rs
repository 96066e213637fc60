//! Read-only aggregate queries backing the statistics engine.
//!
//! # Invariants
//! - Queries never write.
//! - Bounds are always supplied by the caller; nothing here reads a clock.

use crate::model::user::UserId;
use crate::repo::{
    count_from_db, date_to_db, ensure_tables, timestamp_from_db, timestamp_to_db, uuid_from_db,
    RepoResult,
};
use crate::stats::leaderboard::LeaderboardRow;
use crate::stats::snapshot::WindowCounts;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

pub trait StatsRepository {
    /// Terms with `next_review <= today`.
    fn count_due(&self, user: UserId, today: NaiveDate) -> RepoResult<u64>;
    /// Terms with `after < next_review <= until`.
    fn count_due_between(
        &self,
        user: UserId,
        after: NaiveDate,
        until: NaiveDate,
    ) -> RepoResult<u64>;
    /// Review events with `reviewed_at >= since`.
    fn count_reviews_since(&self, user: UserId, since: NaiveDateTime) -> RepoResult<u64>;
    /// Terms created at or after each of the four window starts, in one pass.
    fn count_terms_created_in_windows(
        &self,
        user: UserId,
        starts: [NaiveDateTime; 4],
    ) -> RepoResult<WindowCounts>;
    /// Review events logged at or after each of the four window starts.
    fn count_reviews_in_windows(
        &self,
        user: UserId,
        starts: [NaiveDateTime; 4],
    ) -> RepoResult<WindowCounts>;
    /// Creation timestamps within `[start, end)`.
    fn term_created_times(
        &self,
        user: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<NaiveDateTime>>;
    /// Review timestamps within `[start, end)`.
    fn review_times(
        &self,
        user: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<NaiveDateTime>>;
    /// Users owning at least one term, with their count of terms at
    /// `max_stage` (mastered within the inclusive `mastered_window` when
    /// bounded).
    /// Ordered by count descending, then user id ascending.
    fn leaderboard_rows(
        &self,
        max_stage: u8,
        mastered_window: Option<(NaiveDateTime, NaiveDateTime)>,
        limit: u32,
    ) -> RepoResult<Vec<LeaderboardRow>>;
}

/// SQLite-backed aggregate queries.
pub struct SqliteStatsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "terms", "reviews"])?;
        Ok(Self { conn })
    }

    fn count_in_windows(
        &self,
        sql: &str,
        user: UserId,
        starts: [NaiveDateTime; 4],
    ) -> RepoResult<WindowCounts> {
        let [s1, s7, s30, s365] = starts.map(timestamp_to_db);
        let earliest = s1.min(s7).min(s30).min(s365);
        let raw: [i64; 4] = self.conn.query_row(
            sql,
            params![user.to_string(), s1, s7, s30, s365, earliest],
            |row| Ok([row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?]),
        )?;
        let mut counts = [0_u64; 4];
        for (slot, value) in counts.iter_mut().zip(raw) {
            *slot = count_from_db(value)?;
        }
        Ok(WindowCounts(counts))
    }

    fn times_between(
        &self,
        sql: &str,
        user: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        column: &str,
    ) -> RepoResult<Vec<NaiveDateTime>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![
            user.to_string(),
            timestamp_to_db(start),
            timestamp_to_db(end),
        ])?;
        let mut times = Vec::new();
        while let Some(row) = rows.next()? {
            times.push(timestamp_from_db(row.get(0)?, column)?);
        }
        Ok(times)
    }
}

impl StatsRepository for SqliteStatsRepository<'_> {
    fn count_due(&self, user: UserId, today: NaiveDate) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM terms WHERE user_uuid = ?1 AND next_review <= ?2;",
            params![user.to_string(), date_to_db(today)],
            |row| row.get(0),
        )?;
        count_from_db(count)
    }

    fn count_due_between(
        &self,
        user: UserId,
        after: NaiveDate,
        until: NaiveDate,
    ) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM terms
             WHERE user_uuid = ?1
               AND next_review > ?2
               AND next_review <= ?3;",
            params![user.to_string(), date_to_db(after), date_to_db(until)],
            |row| row.get(0),
        )?;
        count_from_db(count)
    }

    fn count_reviews_since(&self, user: UserId, since: NaiveDateTime) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE user_uuid = ?1 AND reviewed_at >= ?2;",
            params![user.to_string(), timestamp_to_db(since)],
            |row| row.get(0),
        )?;
        count_from_db(count)
    }

    fn count_terms_created_in_windows(
        &self,
        user: UserId,
        starts: [NaiveDateTime; 4],
    ) -> RepoResult<WindowCounts> {
        self.count_in_windows(
            "SELECT
                COALESCE(SUM(CASE WHEN created_at >= ?2 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN created_at >= ?3 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN created_at >= ?4 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN created_at >= ?5 THEN 1 ELSE 0 END), 0)
             FROM terms
             WHERE user_uuid = ?1
               AND created_at >= ?6;",
            user,
            starts,
        )
    }

    fn count_reviews_in_windows(
        &self,
        user: UserId,
        starts: [NaiveDateTime; 4],
    ) -> RepoResult<WindowCounts> {
        self.count_in_windows(
            "SELECT
                COALESCE(SUM(CASE WHEN reviewed_at >= ?2 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN reviewed_at >= ?3 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN reviewed_at >= ?4 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN reviewed_at >= ?5 THEN 1 ELSE 0 END), 0)
             FROM reviews
             WHERE user_uuid = ?1
               AND reviewed_at >= ?6;",
            user,
            starts,
        )
    }

    fn term_created_times(
        &self,
        user: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<NaiveDateTime>> {
        self.times_between(
            "SELECT created_at
             FROM terms
             WHERE user_uuid = ?1
               AND created_at >= ?2
               AND created_at < ?3;",
            user,
            start,
            end,
            "terms.created_at",
        )
    }

    fn review_times(
        &self,
        user: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<NaiveDateTime>> {
        self.times_between(
            "SELECT reviewed_at
             FROM reviews
             WHERE user_uuid = ?1
               AND reviewed_at >= ?2
               AND reviewed_at < ?3;",
            user,
            start,
            end,
            "reviews.reviewed_at",
        )
    }

    fn leaderboard_rows(
        &self,
        max_stage: u8,
        mastered_window: Option<(NaiveDateTime, NaiveDateTime)>,
        limit: u32,
    ) -> RepoResult<Vec<LeaderboardRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                u.uuid,
                u.email,
                COALESCE(SUM(
                    CASE
                        WHEN t.stage = ?1
                             AND (?2 IS NULL OR (t.mastered_at >= ?2 AND t.mastered_at <= ?3))
                        THEN 1
                        ELSE 0
                    END
                ), 0) AS learned_words
             FROM users u
             INNER JOIN terms t ON t.user_uuid = u.uuid
             GROUP BY u.uuid, u.email
             ORDER BY learned_words DESC, u.uuid ASC
             LIMIT ?4;",
        )?;
        let mut rows = stmt.query(params![
            max_stage,
            mastered_window.map(|(start, _)| timestamp_to_db(start)),
            mastered_window.map(|(_, end)| timestamp_to_db(end)),
            i64::from(limit),
        ])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            entries.push(LeaderboardRow {
                user_id: uuid_from_db(&uuid_text, "users.uuid")?,
                email: row.get(1)?,
                learned_words: count_from_db(row.get(2)?)?,
            });
        }
        Ok(entries)
    }
}
