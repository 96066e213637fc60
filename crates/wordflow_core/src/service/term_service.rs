//! Term use-case service.
//!
//! # Responsibility
//! - Create, edit, star, list and delete a user's terms.
//! - Normalize text fields and tag sets before persistence.
//!
//! # Invariants
//! - New terms start at stage 0 and are due on their creation day.
//! - Edits never touch scheduling fields.
//! - Tags are trimmed, lowercased and deduplicated.

use crate::model::tags::{normalize_tag, TagSet};
use crate::model::term::{Term, TermId, TermValidationError};
use crate::model::user::UserId;
use crate::repo::term_repo::{normalize_term_limit, TermListQuery, TermRepository};
use crate::repo::RepoError;
use chrono::NaiveDateTime;
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TermServiceError {
    #[error(transparent)]
    Validation(#[from] TermValidationError),
    #[error("term not found: {0}")]
    TermNotFound(TermId),
    #[error(transparent)]
    Repo(RepoError),
    /// Write succeeded but read-back did not see it.
    #[error("inconsistent term state: {0}")]
    InconsistentState(&'static str),
}

impl From<RepoError> for TermServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TermNotFound(id) => Self::TermNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Input for a new term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTerm {
    pub source: String,
    pub translation: String,
    pub example: Option<String>,
    pub tags: Vec<String>,
    pub starred: bool,
}

/// Partial edit. `None` leaves a field unchanged; a blank example clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermPatch {
    pub source: Option<String>,
    pub translation: Option<String>,
    pub example: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// List result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsListResult {
    /// Sorted by `created_at DESC, uuid ASC`.
    pub items: Vec<Term>,
    pub applied_limit: u32,
}

pub struct TermService<R: TermRepository> {
    repo: R,
}

impl<R: TermRepository> TermService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one term owned by `user`, due immediately.
    pub fn create_term(
        &self,
        user: UserId,
        input: NewTerm,
        now: NaiveDateTime,
    ) -> Result<Term, TermServiceError> {
        let mut term = Term::new(
            Some(user),
            input.source.trim(),
            input.translation.trim(),
            now,
        );
        term.example = normalize_example(input.example);
        term.tags = input.tags.into_iter().collect();
        term.starred = input.starred;

        let term_id = self.repo.create_term(&term)?;
        info!(
            "event=term_create module=term status=ok term_id={} tag_count={}",
            term_id,
            term.tags.len()
        );
        self.repo
            .get_term(term_id)?
            .ok_or(TermServiceError::InconsistentState(
                "created term not found in read-back",
            ))
    }

    /// Applies a partial edit to an owned term.
    pub fn update_term(
        &self,
        term_id: TermId,
        user: UserId,
        patch: TermPatch,
    ) -> Result<Term, TermServiceError> {
        let mut term = self.get_term(term_id, user)?;
        if let Some(source) = patch.source {
            term.source = source.trim().to_string();
        }
        if let Some(translation) = patch.translation {
            term.translation = translation.trim().to_string();
        }
        if let Some(example) = patch.example {
            term.example = normalize_example(Some(example));
        }
        if let Some(tags) = patch.tags {
            term.tags = tags.into_iter().collect::<TagSet>();
        }

        self.repo.update_term(&term)?;
        self.repo
            .get_term(term_id)?
            .ok_or(TermServiceError::InconsistentState(
                "updated term not found in read-back",
            ))
    }

    /// Gets one owned term.
    pub fn get_term(&self, term_id: TermId, user: UserId) -> Result<Term, TermServiceError> {
        self.repo
            .get_term(term_id)?
            .filter(|term| term.is_owned_by(user))
            .ok_or(TermServiceError::TermNotFound(term_id))
    }

    pub fn delete_term(&self, term_id: TermId, user: UserId) -> Result<(), TermServiceError> {
        self.repo.delete_term(term_id, user)?;
        info!("event=term_delete module=term status=ok term_id={term_id}");
        Ok(())
    }

    pub fn set_starred(
        &self,
        term_id: TermId,
        user: UserId,
        starred: bool,
    ) -> Result<Term, TermServiceError> {
        self.repo.set_starred(term_id, user, starred)?;
        self.get_term(term_id, user)
    }

    /// Lists owned terms with optional text/tag/starred filters.
    pub fn list_terms(
        &self,
        user: UserId,
        mut query: TermListQuery,
    ) -> Result<TermsListResult, TermServiceError> {
        let applied_limit = normalize_term_limit(query.limit);
        query.limit = Some(applied_limit);
        query.tag = query
            .tag
            .and_then(|tag| tag.split(',').find_map(normalize_tag));
        let items = self.repo.list_terms(user, &query)?;
        Ok(TermsListResult {
            items,
            applied_limit,
        })
    }

    pub fn list_tags(&self, user: UserId) -> Result<Vec<String>, TermServiceError> {
        Ok(self.repo.list_tags(user)?)
    }

    /// Hands owner-less legacy terms to `user` if nobody claimed any yet.
    pub fn claim_legacy_terms(&self, user: UserId) -> Result<usize, TermServiceError> {
        let claimed = self.repo.claim_legacy_terms(user)?;
        if claimed > 0 {
            info!("event=legacy_claim module=term status=ok user_id={user} claimed={claimed}");
        }
        Ok(claimed)
    }
}

fn normalize_example(example: Option<String>) -> Option<String> {
    example
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::normalize_example;

    #[test]
    fn blank_example_is_dropped() {
        assert_eq!(normalize_example(Some("   ".to_string())), None);
        assert_eq!(
            normalize_example(Some(" Hola amigo ".to_string())),
            Some("Hola amigo".to_string())
        );
    }
}
