//! Leaderboard rows and identity masking.
//!
//! # Invariants
//! - Raw user ids and emails stay inside core; entries only carry the mask.
//! - Limit is always within `[1, 50]`.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

pub const LEADERBOARD_DEFAULT_LIMIT: u32 = 10;
pub const LEADERBOARD_LIMIT_MAX: u32 = 50;

/// Masked label used when an identity has no `@`.
const ANONYMOUS_LABEL: &str = "User";

/// Unmasked aggregate row as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub user_id: UserId,
    pub email: String,
    pub learned_words: u64,
}

/// Display entry returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: String,
    pub learned_words: u64,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            user: mask_email(&row.email),
            learned_words: row.learned_words,
        }
    }
}

/// Clamps a requested limit to `[1, 50]`, defaulting to 10.
pub fn normalize_leaderboard_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(LEADERBOARD_DEFAULT_LIMIT)
        .clamp(1, LEADERBOARD_LIMIT_MAX)
}

/// Display mask for an email address.
///
/// - `alpha@example.com` -> `f a***a@example.com`
/// - `al@example.com` -> `a***@example.com`
/// - no `@` -> `User`
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return ANONYMOUS_LABEL.to_string();
    };

    let mut chars = local.chars();
    let first = chars.next();
    let last = chars.next_back();
    match (first, last) {
        (Some(first), Some(last)) if local.chars().count() > 2 => {
            format!("f {first}***{last}@{domain}")
        }
        (Some(first), _) => format!("{first}***@{domain}"),
        (None, _) => format!("***@{domain}"),
    }
}
