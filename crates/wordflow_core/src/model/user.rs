//! User identity model.
//!
//! Users are only a grouping key for terms and review events. The email is
//! kept for masked leaderboard display and never leaves core unmasked.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier used to partition terms and review events.
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uuid: UserId,
    /// Lowercase, trimmed email.
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn new(email: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            email: email.into(),
            created_at: now,
        }
    }
}
