//! Spaced-repetition scheduling engine.
//!
//! # Responsibility
//! - Map stages to review intervals (`stage_table`).
//! - Advance or reset a term's stage from a review outcome (`scheduler`).
//! - Stamp first mastery (`mastery`).
//!
//! # Invariants
//! - Every function here is pure: `today`/`now` are always parameters.

pub mod mastery;
pub mod scheduler;
pub mod stage_table;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("stage {stage} is outside 0..={max_stage}")]
    StageOutOfRange { stage: u8, max_stage: u8 },
}
