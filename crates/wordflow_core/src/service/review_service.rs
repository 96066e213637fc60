//! Review use-case service.
//!
//! # Responsibility
//! - Validate a review outcome, schedule the term and persist the result.
//! - Serve the due queue and per-term review history.
//!
//! # Invariants
//! - Outcome is parsed before any read or write.
//! - Stage, due date, mastery stamp and the event are written in one
//!   repository call (`apply_review`).

use crate::model::review::{InvalidOutcome, ReviewEvent, ReviewOutcome};
use crate::model::term::{Term, TermId};
use crate::model::user::UserId;
use crate::repo::term_repo::{TermRepository, TermScheduleUpdate};
use crate::repo::RepoError;
use crate::schedule::mastery::stamp_mastery;
use crate::schedule::scheduler::advance;
use crate::schedule::stage_table::StageTable;
use crate::schedule::ScheduleError;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    InvalidOutcome(#[from] InvalidOutcome),
    /// Missing, or owned by someone else.
    #[error("term not found: {0}")]
    TermNotFound(TermId),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ReviewServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TermNotFound(id) => Self::TermNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Review facade over a term repository and the active stage table.
pub struct ReviewService<R: TermRepository> {
    repo: R,
    table: StageTable,
}

impl<R: TermRepository> ReviewService<R> {
    pub fn new(repo: R, table: StageTable) -> Self {
        Self { repo, table }
    }

    pub fn stage_table(&self) -> &StageTable {
        &self.table
    }

    /// Records one review of `term_id` by `user` at `now`.
    ///
    /// # Errors
    /// - `InvalidOutcome` for anything other than `good`/`bad`; nothing is
    ///   read or written.
    /// - `TermNotFound` when the term is missing or not owned by `user`.
    /// - `Schedule` when the stored stage exceeds the active table.
    pub fn record_review(
        &self,
        term_id: TermId,
        outcome: &str,
        user: UserId,
        now: NaiveDateTime,
    ) -> Result<Term, ReviewServiceError> {
        let outcome: ReviewOutcome = outcome.parse()?;
        let term = self
            .repo
            .get_term(term_id)?
            .filter(|term| term.is_owned_by(user))
            .ok_or(ReviewServiceError::TermNotFound(term_id))?;

        let next = advance(&self.table, term.stage, outcome, now.date())?;
        let update = TermScheduleUpdate {
            stage: next.stage,
            next_review: next.next_review,
            mastered_at: stamp_mastery(&self.table, next.stage, term.mastered_at, now),
        };
        let event = ReviewEvent::new(term.uuid, term.owner, outcome, now, next.next_review);

        let applied = self.repo.apply_review(&term, &update, event)?;
        if applied.superseded {
            warn!(
                "event=review_record module=review status=superseded term_id={} outcome={} stored_stage={}",
                term_id, outcome, applied.term.stage
            );
        } else {
            info!(
                "event=review_record module=review status=ok term_id={} outcome={} from_stage={} to_stage={} next_review={}",
                term_id, outcome, term.stage, applied.term.stage, applied.term.next_review
            );
        }
        if term.mastered_at.is_none() && applied.term.mastered_at.is_some() {
            info!("event=term_mastered module=review status=ok term_id={term_id}");
        }

        Ok(applied.term)
    }

    /// Due terms for `user` as of `today`, ordered by due date then stage.
    pub fn due_terms(
        &self,
        user: UserId,
        today: NaiveDate,
        limit: Option<u32>,
    ) -> Result<Vec<Term>, ReviewServiceError> {
        Ok(self.repo.find_due(user, today, limit)?)
    }

    /// Review log of one owned term, oldest first.
    pub fn review_history(
        &self,
        term_id: TermId,
        user: UserId,
    ) -> Result<Vec<ReviewEvent>, ReviewServiceError> {
        self.repo
            .get_term(term_id)?
            .filter(|term| term.is_owned_by(user))
            .ok_or(ReviewServiceError::TermNotFound(term_id))?;
        Ok(self.repo.list_reviews(term_id)?)
    }
}
