//! Stage to interval lookup.

use crate::schedule::ScheduleError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in spacing: 1, 3, 7, 14 and 30 days.
pub const DEFAULT_INTERVALS: [u32; 5] = [1, 3, 7, 14, 30];

/// Stage count is bounded so `max_stage` always fits a `u8`.
const MAX_TABLE_LEN: usize = u8::MAX as usize + 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageTableError {
    #[error("stage table must contain at least one interval")]
    Empty,
    #[error("stage table supports at most 256 stages, got {0}")]
    TooLong(usize),
    #[error("interval for stage {stage} must be at least one day")]
    ZeroInterval { stage: usize },
}

/// Ordered day intervals indexed by stage. `max_stage = len - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct StageTable {
    intervals: Vec<u32>,
}

impl StageTable {
    pub fn new(intervals: Vec<u32>) -> Result<Self, StageTableError> {
        if intervals.is_empty() {
            return Err(StageTableError::Empty);
        }
        if intervals.len() > MAX_TABLE_LEN {
            return Err(StageTableError::TooLong(intervals.len()));
        }
        if let Some(stage) = intervals.iter().position(|days| *days == 0) {
            return Err(StageTableError::ZeroInterval { stage });
        }
        Ok(Self { intervals })
    }

    pub fn max_stage(&self) -> u8 {
        // `new` bounds the length, so the cast cannot truncate.
        (self.intervals.len() - 1) as u8
    }

    /// Days until the next review for a term sitting at `stage`.
    pub fn interval(&self, stage: u8) -> Result<u32, ScheduleError> {
        self.intervals
            .get(usize::from(stage))
            .copied()
            .ok_or(ScheduleError::StageOutOfRange {
                stage,
                max_stage: self.max_stage(),
            })
    }

    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.to_vec(),
        }
    }
}

impl TryFrom<Vec<u32>> for StageTable {
    type Error = StageTableError;

    fn try_from(value: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageTable> for Vec<u32> {
    fn from(value: StageTable) -> Self {
        value.intervals
    }
}

#[cfg(test)]
mod tests {
    use super::{StageTable, StageTableError};
    use crate::schedule::ScheduleError;

    #[test]
    fn default_table_has_five_stages() {
        let table = StageTable::default();
        assert_eq!(table.max_stage(), 4);
        assert_eq!(table.interval(0), Ok(1));
        assert_eq!(table.interval(4), Ok(30));
    }

    #[test]
    fn interval_past_last_stage_is_an_error() {
        let table = StageTable::default();
        assert_eq!(
            table.interval(5),
            Err(ScheduleError::StageOutOfRange {
                stage: 5,
                max_stage: 4
            })
        );
    }

    #[test]
    fn new_rejects_empty_and_zero_intervals() {
        assert_eq!(StageTable::new(vec![]), Err(StageTableError::Empty));
        assert_eq!(
            StageTable::new(vec![1, 0, 3]),
            Err(StageTableError::ZeroInterval { stage: 1 })
        );
    }
}
