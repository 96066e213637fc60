//! Term domain model.
//!
//! # Responsibility
//! - Define the reviewable unit and its scheduling state.
//! - Validate content before persistence.
//!
//! # Invariants
//! - `0 <= stage <= max_stage` for the active stage table; the scheduler
//!   rejects anything else.
//! - `mastered_at` tombstones the first time the term reached the last
//!   stage; a later reset never clears it.
//! - `created_at` is immutable after creation.

use crate::model::tags::TagSet;
use crate::model::user::UserId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a term.
pub type TermId = Uuid;

/// Validation failure for term content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermValidationError {
    #[error("term source text cannot be blank")]
    BlankSource,
    #[error("term translation cannot be blank")]
    BlankTranslation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub uuid: TermId,
    /// `None` for legacy terms that have not been claimed by any user.
    pub owner: Option<UserId>,
    pub source: String,
    pub translation: String,
    pub example: Option<String>,
    pub tags: TagSet,
    pub starred: bool,
    pub stage: u8,
    pub next_review: NaiveDate,
    pub mastered_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Term {
    /// Creates a fresh term at stage 0, due on the creation day.
    pub fn new(
        owner: Option<UserId>,
        source: impl Into<String>,
        translation: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner,
            source: source.into(),
            translation: translation.into(),
            example: None,
            tags: TagSet::new(),
            starred: false,
            stage: 0,
            next_review: now.date(),
            mastered_at: None,
            created_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), TermValidationError> {
        if self.source.trim().is_empty() {
            return Err(TermValidationError::BlankSource);
        }
        if self.translation.trim().is_empty() {
            return Err(TermValidationError::BlankTranslation);
        }
        Ok(())
    }

    /// Due means `next_review` is on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }

    /// Whether the term has ever reached the last stage.
    pub fn is_mastered(&self) -> bool {
        self.mastered_at.is_some()
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == Some(user)
    }
}

#[cfg(test)]
mod tests {
    use super::{Term, TermValidationError};
    use chrono::NaiveDate;

    fn noon() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn new_term_starts_at_stage_zero_and_is_due_today() {
        let term = Term::new(None, "hola", "hello", noon());
        assert_eq!(term.stage, 0);
        assert_eq!(term.next_review, noon().date());
        assert!(term.is_due(noon().date()));
        assert!(!term.is_mastered());
    }

    #[test]
    fn validate_rejects_blank_text() {
        let mut term = Term::new(None, "  ", "hello", noon());
        assert_eq!(term.validate(), Err(TermValidationError::BlankSource));

        term.source = "hola".to_string();
        term.translation = "\t".to_string();
        assert_eq!(term.validate(), Err(TermValidationError::BlankTranslation));

        term.translation = "hello".to_string();
        assert_eq!(term.validate(), Ok(()));
    }
}
