//! First-mastery detection.

use crate::schedule::stage_table::StageTable;
use chrono::NaiveDateTime;

/// Returns the `mastered_at` value a term should carry after a review.
///
/// Stamps `now` only when the new stage is the table's last stage and the
/// term has never been mastered before. An existing stamp is kept as-is,
/// including after a reset to stage 0.
pub fn stamp_mastery(
    table: &StageTable,
    new_stage: u8,
    current: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    match current {
        Some(stamped) => Some(stamped),
        None if new_stage == table.max_stage() => Some(now),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::stamp_mastery;
    use crate::schedule::stage_table::StageTable;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 2)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn reaching_last_stage_first_time_stamps_now() {
        let table = StageTable::default();
        assert_eq!(stamp_mastery(&table, 4, None, at(9)), Some(at(9)));
    }

    #[test]
    fn lower_stage_does_not_stamp() {
        let table = StageTable::default();
        assert_eq!(stamp_mastery(&table, 3, None, at(9)), None);
    }

    #[test]
    fn existing_stamp_survives_repeat_mastery_and_reset() {
        let table = StageTable::default();
        assert_eq!(stamp_mastery(&table, 4, Some(at(8)), at(9)), Some(at(8)));
        assert_eq!(stamp_mastery(&table, 0, Some(at(8)), at(9)), Some(at(8)));
    }
}
