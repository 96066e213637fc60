//! Per-user counters snapshot.

use serde::{Deserialize, Serialize};

/// Counters computed against one fixed `now`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub due_today: u64,
    pub reviewed_today: u64,
    pub new_1d: u64,
    pub new_7d: u64,
    pub new_30d: u64,
    pub new_365d: u64,
    pub reviews_1d: u64,
    pub reviews_7d: u64,
    pub reviews_30d: u64,
    pub reviews_365d: u64,
    pub due_next_7d: u64,
}

/// One count per snapshot window, ordered 1/7/30/365 days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCounts(pub [u64; 4]);

impl StatsSnapshot {
    pub fn with_new_terms(mut self, counts: WindowCounts) -> Self {
        let [d1, d7, d30, d365] = counts.0;
        self.new_1d = d1;
        self.new_7d = d7;
        self.new_30d = d30;
        self.new_365d = d365;
        self
    }

    pub fn with_reviews(mut self, counts: WindowCounts) -> Self {
        let [d1, d7, d30, d365] = counts.0;
        self.reviews_1d = d1;
        self.reviews_7d = d7;
        self.reviews_30d = d30;
        self.reviews_365d = d365;
        self
    }
}
