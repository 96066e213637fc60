//! User registration and lookup.
//!
//! Credentials and verification live outside core; a user here is only an
//! id plus the email used for masked leaderboard display.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use chrono::NaiveDateTime;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("invalid email: `{0}`")]
    InvalidEmail(String),
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEmail => Self::DuplicateEmail,
            other => Self::Repo(other),
        }
    }
}

pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user under a normalized (trimmed, lowercase) email.
    pub fn register(&self, email: &str, now: NaiveDateTime) -> Result<User, UserServiceError> {
        let email = normalize_email(email)?;
        let user = User::new(email, now);
        self.repo.create_user(&user)?;
        info!(
            "event=user_register module=user status=ok user_id={}",
            user.uuid
        );
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, UserServiceError> {
        self.repo
            .get_user(id)?
            .ok_or(UserServiceError::UserNotFound(id))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        let email = normalize_email(email)?;
        Ok(self.repo.find_by_email(&email)?)
    }
}

/// Trims and lowercases an email, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, UserServiceError> {
    let normalized = email.trim().to_lowercase();
    if EMAIL_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(UserServiceError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, UserServiceError};

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Alpha@Example.COM ").unwrap(),
            "alpha@example.com"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["", "alpha", "alpha@", "a b@example.com", "a@@example.com"] {
            let err = normalize_email(bad).unwrap_err();
            assert!(matches!(err, UserServiceError::InvalidEmail(_)), "{bad}");
        }
    }
}
