//! Trailing windows and requestable ranges.

use crate::stats::StatsError;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Window lengths reported by the counters snapshot.
pub const SNAPSHOT_WINDOWS_DAYS: [i64; 4] = [1, 7, 30, 365];

/// Start of a trailing window of `days` ending at `now`.
pub fn window_start(now: NaiveDateTime, days: i64) -> NaiveDateTime {
    now - Duration::days(days)
}

/// Range accepted by the activity chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesRange {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "365d")]
    Year,
}

impl SeriesRange {
    pub const ALL: [SeriesRange; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Year => "365d",
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

impl FromStr for SeriesRange {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1d" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "365d" => Ok(Self::Year),
            _ => Err(StatsError::InvalidRange {
                value: value.to_string(),
                expected: "1d|7d|30d|365d",
            }),
        }
    }
}

impl Display for SeriesRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range accepted by the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderboardRange {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "365d")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl LeaderboardRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Year => "365d",
            Self::All => "all",
        }
    }

    /// Inclusive `[start, now]` bounds on `mastered_at`, `None` for the
    /// unbounded range.
    pub fn mastered_window(
        self,
        now: NaiveDateTime,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let days = match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
            Self::All => return None,
        };
        Some((window_start(now, days), now))
    }
}

impl FromStr for LeaderboardRange {
    type Err = StatsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "365d" => Ok(Self::Year),
            "all" => Ok(Self::All),
            _ => Err(StatsError::InvalidRange {
                value: value.to_string(),
                expected: "7d|30d|365d|all",
            }),
        }
    }
}

impl Display for LeaderboardRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
