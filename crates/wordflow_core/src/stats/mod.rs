//! Read-only aggregation over terms and the review log.
//!
//! # Responsibility
//! - Parse and validate requested ranges (`window`).
//! - Build time-series bucket plans and fold timestamps into them (`series`).
//! - Mask leaderboard identities (`leaderboard`).
//! - Define the per-user counters snapshot (`snapshot`).
//!
//! # Invariants
//! - Nothing here mutates a term or review.
//! - Every computation takes one caller-supplied `now`.

pub mod leaderboard;
pub mod series;
pub mod snapshot;
pub mod window;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("unsupported range `{value}`; expected one of {expected}")]
    InvalidRange {
        value: String,
        expected: &'static str,
    },
}
