//! Activity chart bucketing.
//!
//! A 1-day range is split into 24 hourly buckets, any other range into one
//! bucket per day. Buckets are half-open `[start, start + step)` and the
//! last bucket always contains `now`.

use crate::stats::window::SeriesRange;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Fixed-width sub-interval of a series range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
}

/// Ordered buckets covering one range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPlan {
    step: Duration,
    buckets: Vec<Bucket>,
}

impl BucketPlan {
    pub fn for_range(range: SeriesRange, now: NaiveDateTime) -> Self {
        let (step, count, last_start, label_format) = match range {
            SeriesRange::Day => {
                let hour_floor =
                    now.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(now.hour()));
                (Duration::hours(1), 24, hour_floor, "%H:00")
            }
            other => {
                let day_floor = now.date().and_time(NaiveTime::MIN);
                (Duration::days(1), other.days(), day_floor, "%m-%d")
            }
        };

        let first_start = last_start - step * (count as i32 - 1);
        let buckets = (0..count)
            .map(|idx| {
                let start = first_start + step * idx as i32;
                Bucket {
                    start,
                    end: start + step,
                    label: start.format(label_format).to_string(),
                }
            })
            .collect();

        Self { step, buckets }
    }

    /// Inclusive lower bound of the first bucket.
    pub fn start(&self) -> NaiveDateTime {
        self.buckets[0].start
    }

    /// Exclusive upper bound of the last bucket.
    pub fn end(&self) -> NaiveDateTime {
        self.buckets[self.buckets.len() - 1].end
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|bucket| bucket.label.clone()).collect()
    }

    /// Counts timestamps per bucket. Out-of-range timestamps are ignored.
    pub fn count<I>(&self, timestamps: I) -> Vec<u64>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut counts = vec![0_u64; self.buckets.len()];
        let start = self.start();
        let end = self.end();
        let step_ms = self.step.num_milliseconds();
        for ts in timestamps {
            if ts < start || ts >= end {
                continue;
            }
            let offset_ms = (ts - start).num_milliseconds();
            let idx = (offset_ms / step_ms) as usize;
            if let Some(slot) = counts.get_mut(idx) {
                *slot += 1;
            }
        }
        counts
    }
}

/// Chart payload: one label and two counters per bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySeries {
    pub range: SeriesRange,
    pub labels: Vec<String>,
    pub new_terms: Vec<u64>,
    pub reviews: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::BucketPlan;
    use crate::stats::window::SeriesRange;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn day_range_has_24_hourly_buckets_ending_with_current_hour() {
        let now = at(15, 13, 42);
        let plan = BucketPlan::for_range(SeriesRange::Day, now);
        assert_eq!(plan.len(), 24);
        assert_eq!(plan.start(), at(14, 14, 0));
        assert_eq!(plan.end(), at(15, 14, 0));
        assert_eq!(plan.buckets()[23].label, "13:00");
        assert!(plan.buckets()[23].start <= now && now < plan.buckets()[23].end);
    }

    #[test]
    fn multi_day_ranges_have_one_bucket_per_day() {
        let now = at(15, 8, 0);
        for range in [SeriesRange::Week, SeriesRange::Month, SeriesRange::Year] {
            let plan = BucketPlan::for_range(range, now);
            assert_eq!(plan.len() as i64, range.days());
            assert_eq!(plan.buckets().last().unwrap().label, "04-15");
        }
    }

    #[test]
    fn count_uses_half_open_boundaries() {
        let now = at(15, 13, 42);
        let plan = BucketPlan::for_range(SeriesRange::Day, now);
        let counts = plan.count([
            at(14, 14, 0),
            at(14, 14, 59),
            at(14, 15, 0),
            at(15, 13, 41),
            at(14, 13, 59),
            at(15, 14, 0),
        ]);
        assert_eq!(counts.len(), 24);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[1], 1);
        assert_eq!(counts[23], 1);
        assert_eq!(counts.iter().sum::<u64>(), 4);
    }

    #[test]
    fn empty_input_reports_zero_for_every_bucket() {
        let plan = BucketPlan::for_range(SeriesRange::Week, at(15, 0, 0));
        assert_eq!(plan.count(Vec::new()), vec![0; 7]);
    }
}
