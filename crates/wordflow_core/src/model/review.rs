//! Review outcome and append-only review event log record.

use crate::model::term::TermId;
use crate::model::user::UserId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub type ReviewId = Uuid;

/// Outcome value outside `{good, bad}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("review outcome must be `good` or `bad`, got `{0}`")]
pub struct InvalidOutcome(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Good,
    Bad,
}

impl ReviewOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

impl FromStr for ReviewOutcome {
    type Err = InvalidOutcome;

    /// Accepts `good`/`bad` in any case, surrounding whitespace ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "bad" => Ok(Self::Bad),
            _ => Err(InvalidOutcome(value.to_string())),
        }
    }
}

impl Display for ReviewOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged review. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub uuid: ReviewId,
    pub term_id: TermId,
    pub owner: Option<UserId>,
    pub outcome: ReviewOutcome,
    pub reviewed_at: NaiveDateTime,
    /// Due date computed by this review.
    pub next_review_assigned: NaiveDate,
}

impl ReviewEvent {
    pub fn new(
        term_id: TermId,
        owner: Option<UserId>,
        outcome: ReviewOutcome,
        reviewed_at: NaiveDateTime,
        next_review_assigned: NaiveDate,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            term_id,
            owner,
            outcome,
            reviewed_at,
            next_review_assigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidOutcome, ReviewOutcome};

    #[test]
    fn outcome_parsing_is_case_and_whitespace_insensitive() {
        assert_eq!(" GOOD ".parse::<ReviewOutcome>(), Ok(ReviewOutcome::Good));
        assert_eq!("bad".parse::<ReviewOutcome>(), Ok(ReviewOutcome::Bad));
    }

    #[test]
    fn unknown_outcome_is_rejected() {
        assert_eq!(
            "meh".parse::<ReviewOutcome>(),
            Err(InvalidOutcome("meh".to_string()))
        );
    }
}
