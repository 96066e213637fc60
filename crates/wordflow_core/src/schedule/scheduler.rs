//! Stage advance/reset rules.
//!
//! `good` moves one stage up (capped at the last stage) and schedules the
//! next review after that stage's interval. `bad` resets to stage 0 and
//! retries the next day regardless of the table.

use crate::model::review::ReviewOutcome;
use crate::schedule::stage_table::StageTable;
use crate::schedule::ScheduleError;
use chrono::{Days, NaiveDate};

/// Cool-down after a failed review.
pub const RETRY_AFTER_BAD_DAYS: u64 = 1;

/// Result of one scheduling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub stage: u8,
    pub next_review: NaiveDate,
}

/// Computes the stage and due date that follow a review.
///
/// # Errors
/// - `StageOutOfRange` when `stage` exceeds the table's last stage.
pub fn advance(
    table: &StageTable,
    stage: u8,
    outcome: ReviewOutcome,
    today: NaiveDate,
) -> Result<Advance, ScheduleError> {
    let max_stage = table.max_stage();
    if stage > max_stage {
        return Err(ScheduleError::StageOutOfRange { stage, max_stage });
    }

    let advance = match outcome {
        ReviewOutcome::Good => {
            let stage = stage.saturating_add(1).min(max_stage);
            let days = u64::from(table.interval(stage)?);
            Advance {
                stage,
                next_review: add_days(today, days),
            }
        }
        ReviewOutcome::Bad => Advance {
            stage: 0,
            next_review: add_days(today, RETRY_AFTER_BAD_DAYS),
        },
    };
    Ok(advance)
}

fn add_days(today: NaiveDate, days: u64) -> NaiveDate {
    // Only overflows near NaiveDate::MAX; saturate there.
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::advance;
    use crate::model::review::ReviewOutcome;
    use crate::schedule::stage_table::StageTable;
    use crate::schedule::ScheduleError;
    use chrono::NaiveDate;

    fn day0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    #[test]
    fn good_from_every_stage_moves_up_and_uses_new_stage_interval() {
        let table = StageTable::default();
        for stage in 0..=table.max_stage() {
            let next = advance(&table, stage, ReviewOutcome::Good, day0()).unwrap();
            let expected_stage = (stage + 1).min(table.max_stage());
            assert_eq!(next.stage, expected_stage);
            let waited = (next.next_review - day0()).num_days();
            assert_eq!(waited, i64::from(table.interval(expected_stage).unwrap()));
        }
    }

    #[test]
    fn bad_from_every_stage_resets_and_retries_tomorrow() {
        let table = StageTable::default();
        for stage in 0..=table.max_stage() {
            let next = advance(&table, stage, ReviewOutcome::Bad, day0()).unwrap();
            assert_eq!(next.stage, 0);
            assert_eq!((next.next_review - day0()).num_days(), 1);
        }
    }

    #[test]
    fn stage_two_good_lands_fourteen_days_out() {
        let next = advance(&StageTable::default(), 2, ReviewOutcome::Good, day0()).unwrap();
        assert_eq!(next.stage, 3);
        assert_eq!(next.next_review, NaiveDate::from_ymd_opt(2026, 1, 24).unwrap());
    }

    #[test]
    fn stage_beyond_table_is_rejected() {
        let err = advance(&StageTable::default(), 9, ReviewOutcome::Good, day0()).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::StageOutOfRange {
                stage: 9,
                max_stage: 4
            }
        );
    }

    #[test]
    fn custom_table_changes_spacing_uniformly() {
        let table = StageTable::new(vec![2, 5]).unwrap();
        let next = advance(&table, 0, ReviewOutcome::Good, day0()).unwrap();
        assert_eq!(next.stage, 1);
        assert_eq!((next.next_review - day0()).num_days(), 5);
    }
}
