//! Term and review-log repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `terms` plus tag-set replacement via `term_tags`.
//! - Serve the due queue ordered by `(next_review, stage)`.
//! - Apply a scheduled review and append its event atomically.
//!
//! # Invariants
//! - Content writes call `Term::validate()` before SQL mutations.
//! - `apply_review` runs in one `IMMEDIATE` transaction and only moves the
//!   term when its stored `(stage, next_review)` still matches the snapshot
//!   the update was computed from.
//! - `mastered_at` is only ever filled, never overwritten or cleared.
//! - Review rows are insert-only.

use crate::model::review::{ReviewEvent, ReviewOutcome};
use crate::model::tags::TagSet;
use crate::model::term::{Term, TermId};
use crate::model::user::UserId;
use crate::repo::{
    bool_to_int, date_from_db, date_to_db, ensure_tables, timestamp_from_db, timestamp_to_db,
    uuid_from_db, RepoError, RepoResult,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const TERM_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    source,
    translation,
    example,
    starred,
    stage,
    next_review,
    mastered_at,
    created_at
FROM terms";

const TERMS_DEFAULT_LIMIT: u32 = 50;
const TERMS_LIMIT_MAX: u32 = 200;
const DUE_DEFAULT_LIMIT: u32 = 20;
const DUE_LIMIT_MAX: u32 = 100;

/// Query options for the term list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermListQuery {
    /// Case-insensitive substring of source or translation.
    pub text: Option<String>,
    /// Whole-tag membership filter.
    pub tag: Option<String>,
    pub starred: Option<bool>,
    /// Defaults to 50 and clamps to 200.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Scheduling fields written by one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermScheduleUpdate {
    pub stage: u8,
    pub next_review: NaiveDate,
    /// Only takes effect when the stored value is still null.
    pub mastered_at: Option<NaiveDateTime>,
}

/// Outcome of `apply_review`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedReview {
    /// Term state after the transaction.
    pub term: Term,
    /// The appended event, as stored.
    pub event: ReviewEvent,
    /// `true` when another review committed first; the term was left as
    /// that review wrote it and the event records the stored due date.
    pub superseded: bool,
}

/// Repository interface for terms and the review log.
pub trait TermRepository {
    fn create_term(&self, term: &Term) -> RepoResult<TermId>;
    /// Replaces content fields, the starred flag and the full tag set.
    /// Scheduling fields are left untouched.
    fn update_term(&self, term: &Term) -> RepoResult<()>;
    fn get_term(&self, id: TermId) -> RepoResult<Option<Term>>;
    fn list_terms(&self, user: UserId, query: &TermListQuery) -> RepoResult<Vec<Term>>;
    /// Terms with `next_review <= as_of`, ordered by `(next_review, stage)`.
    fn find_due(&self, user: UserId, as_of: NaiveDate, limit: Option<u32>)
        -> RepoResult<Vec<Term>>;
    fn delete_term(&self, id: TermId, user: UserId) -> RepoResult<()>;
    fn set_starred(&self, id: TermId, user: UserId, starred: bool) -> RepoResult<()>;
    /// Distinct tags used by the user's terms, sorted by name.
    fn list_tags(&self, user: UserId) -> RepoResult<Vec<String>>;
    /// Atomically applies `update` (compare-and-set against `expected`) and
    /// appends `event`.
    fn apply_review(
        &self,
        expected: &Term,
        update: &TermScheduleUpdate,
        event: ReviewEvent,
    ) -> RepoResult<AppliedReview>;
    /// Review events of one term, oldest first.
    fn list_reviews(&self, term_id: TermId) -> RepoResult<Vec<ReviewEvent>>;
    /// Assigns owner-less terms to `user` when no term has an owner yet.
    /// Returns the number of claimed terms.
    fn claim_legacy_terms(&self, user: UserId) -> RepoResult<usize>;
}

/// SQLite-backed term repository.
pub struct SqliteTermRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTermRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["terms", "reviews", "tags", "term_tags"])?;
        Ok(Self { conn })
    }

    fn immediate_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl TermRepository for SqliteTermRepository<'_> {
    fn create_term(&self, term: &Term) -> RepoResult<TermId> {
        term.validate()?;

        let tx = self.immediate_tx()?;
        tx.execute(
            "INSERT INTO terms (
                uuid,
                user_uuid,
                source,
                translation,
                example,
                starred,
                stage,
                next_review,
                mastered_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                term.uuid.to_string(),
                term.owner.map(|id| id.to_string()),
                term.source.as_str(),
                term.translation.as_str(),
                term.example.as_deref(),
                bool_to_int(term.starred),
                term.stage,
                date_to_db(term.next_review),
                term.mastered_at.map(timestamp_to_db),
                timestamp_to_db(term.created_at),
            ],
        )?;
        replace_tags(&tx, &term.uuid.to_string(), &term.tags)?;
        tx.commit()?;

        Ok(term.uuid)
    }

    fn update_term(&self, term: &Term) -> RepoResult<()> {
        term.validate()?;

        let term_uuid = term.uuid.to_string();
        let tx = self.immediate_tx()?;
        let changed = tx.execute(
            "UPDATE terms
             SET
                source = ?1,
                translation = ?2,
                example = ?3,
                starred = ?4
             WHERE uuid = ?5;",
            params![
                term.source.as_str(),
                term.translation.as_str(),
                term.example.as_deref(),
                bool_to_int(term.starred),
                term_uuid.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::TermNotFound(term.uuid));
        }
        replace_tags(&tx, &term_uuid, &term.tags)?;
        tx.commit()?;

        Ok(())
    }

    fn get_term(&self, id: TermId) -> RepoResult<Option<Term>> {
        load_term(self.conn, &id.to_string())
    }

    fn list_terms(&self, user: UserId, query: &TermListQuery) -> RepoResult<Vec<Term>> {
        let mut sql = format!("{TERM_SELECT_SQL} WHERE user_uuid = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user.to_string())];

        if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            sql.push_str(
                " AND (LOWER(source) LIKE ? ESCAPE '\\' OR LOWER(translation) LIKE ? ESCAPE '\\')",
            );
            let pattern = like_pattern(&text.to_lowercase());
            bind_values.push(Value::Text(pattern.clone()));
            bind_values.push(Value::Text(pattern));
        }

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM term_tags tt
                    INNER JOIN tags t ON t.id = tt.tag_id
                    WHERE tt.term_uuid = terms.uuid
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        if let Some(starred) = query.starred {
            sql.push_str(" AND starred = ?");
            bind_values.push(Value::Integer(bool_to_int(starred)));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_term_limit(query.limit))));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next()? {
            terms.push(parse_term_row(self.conn, row)?);
        }
        Ok(terms)
    }

    fn find_due(
        &self,
        user: UserId,
        as_of: NaiveDate,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Term>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TERM_SELECT_SQL}
             WHERE user_uuid = ?1
               AND next_review <= ?2
             ORDER BY next_review ASC, stage ASC, created_at ASC
             LIMIT ?3;"
        ))?;
        let mut rows = stmt.query(params![
            user.to_string(),
            date_to_db(as_of),
            i64::from(normalize_due_limit(limit)),
        ])?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next()? {
            terms.push(parse_term_row(self.conn, row)?);
        }
        Ok(terms)
    }

    fn delete_term(&self, id: TermId, user: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM terms WHERE uuid = ?1 AND user_uuid = ?2;",
            params![id.to_string(), user.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::TermNotFound(id));
        }
        Ok(())
    }

    fn set_starred(&self, id: TermId, user: UserId, starred: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE terms SET starred = ?1 WHERE uuid = ?2 AND user_uuid = ?3;",
            params![bool_to_int(starred), id.to_string(), user.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::TermNotFound(id));
        }
        Ok(())
    }

    fn list_tags(&self, user: UserId) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT t.name
             FROM tags t
             INNER JOIN term_tags tt ON tt.tag_id = t.id
             INNER JOIN terms w ON w.uuid = tt.term_uuid
             WHERE w.user_uuid = ?1
             ORDER BY t.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([user.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            tags.push(value.to_lowercase());
        }
        Ok(tags)
    }

    fn apply_review(
        &self,
        expected: &Term,
        update: &TermScheduleUpdate,
        mut event: ReviewEvent,
    ) -> RepoResult<AppliedReview> {
        let term_uuid = expected.uuid.to_string();
        let tx = self.immediate_tx()?;

        let changed = tx.execute(
            "UPDATE terms
             SET
                stage = ?1,
                next_review = ?2,
                mastered_at = COALESCE(mastered_at, ?3)
             WHERE uuid = ?4
               AND stage = ?5
               AND next_review = ?6;",
            params![
                update.stage,
                date_to_db(update.next_review),
                update.mastered_at.map(timestamp_to_db),
                term_uuid.as_str(),
                expected.stage,
                date_to_db(expected.next_review),
            ],
        )?;
        let superseded = changed == 0;

        let term = load_term(&tx, &term_uuid)?.ok_or(RepoError::TermNotFound(expected.uuid))?;
        if superseded {
            event.next_review_assigned = term.next_review;
        }
        insert_review(&tx, &event)?;
        tx.commit()?;

        Ok(AppliedReview {
            term,
            event,
            superseded,
        })
    }

    fn list_reviews(&self, term_id: TermId) -> RepoResult<Vec<ReviewEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, term_uuid, user_uuid, outcome, reviewed_at, next_review_assigned
             FROM reviews
             WHERE term_uuid = ?1
             ORDER BY reviewed_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([term_id.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_review_row(row)?);
        }
        Ok(events)
    }

    fn claim_legacy_terms(&self, user: UserId) -> RepoResult<usize> {
        let user_uuid = user.to_string();
        let tx = self.immediate_tx()?;
        let any_claimed: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM terms WHERE user_uuid IS NOT NULL);",
            [],
            |row| row.get(0),
        )?;
        if any_claimed == 1 {
            return Ok(0);
        }

        let claimed = tx.execute(
            "UPDATE terms SET user_uuid = ?1 WHERE user_uuid IS NULL;",
            [user_uuid.as_str()],
        )?;
        tx.execute(
            "UPDATE reviews
             SET user_uuid = ?1
             WHERE user_uuid IS NULL
               AND term_uuid IN (SELECT uuid FROM terms WHERE user_uuid = ?1);",
            [user_uuid.as_str()],
        )?;
        tx.commit()?;
        Ok(claimed)
    }
}

/// Normalizes the term list limit: default 50, at most 200.
pub fn normalize_term_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => TERMS_DEFAULT_LIMIT,
        Some(value) => value.min(TERMS_LIMIT_MAX),
    }
}

/// Normalizes the due queue limit: default 20, at most 100.
pub fn normalize_due_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => DUE_DEFAULT_LIMIT,
        Some(value) => value.min(DUE_LIMIT_MAX),
    }
}

fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn replace_tags(tx: &Transaction<'_>, term_uuid: &str, tags: &TagSet) -> RepoResult<()> {
    tx.execute("DELETE FROM term_tags WHERE term_uuid = ?1;", [term_uuid])?;
    for tag in tags.iter() {
        tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1);", [tag])?;
        tx.execute(
            "INSERT INTO term_tags (term_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE name = ?2 COLLATE NOCASE;",
            params![term_uuid, tag],
        )?;
    }
    Ok(())
}

fn insert_review(tx: &Transaction<'_>, event: &ReviewEvent) -> RepoResult<()> {
    tx.execute(
        "INSERT INTO reviews (
            uuid,
            term_uuid,
            user_uuid,
            outcome,
            reviewed_at,
            next_review_assigned
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            event.uuid.to_string(),
            event.term_id.to_string(),
            event.owner.map(|id| id.to_string()),
            event.outcome.as_str(),
            timestamp_to_db(event.reviewed_at),
            date_to_db(event.next_review_assigned),
        ],
    )?;
    Ok(())
}

fn load_term(conn: &Connection, term_uuid: &str) -> RepoResult<Option<Term>> {
    let mut stmt = conn.prepare(&format!("{TERM_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([term_uuid])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_term_row(conn, row)?)),
        None => Ok(None),
    }
}

fn load_tags(conn: &Connection, term_uuid: &str) -> RepoResult<TagSet> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM term_tags tt
         INNER JOIN tags t ON t.id = tt.tag_id
         WHERE tt.term_uuid = ?1;",
    )?;
    let mut rows = stmt.query([term_uuid])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get::<_, String>(0)?);
    }
    Ok(names.into_iter().collect())
}

fn parse_term_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Term> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = uuid_from_db(&uuid_text, "terms.uuid")?;

    let owner = match row.get::<_, Option<String>>("user_uuid")? {
        Some(value) => Some(uuid_from_db(&value, "terms.user_uuid")?),
        None => None,
    };

    let stage_value: i64 = row.get("stage")?;
    let stage = u8::try_from(stage_value).map_err(|_| {
        RepoError::InvalidData(format!("invalid stage `{stage_value}` in terms.stage"))
    })?;

    let starred = match row.get::<_, i64>("starred")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid starred value `{other}` in terms.starred"
            )));
        }
    };

    let next_review_text: String = row.get("next_review")?;
    let mastered_at = match row.get::<_, Option<i64>>("mastered_at")? {
        Some(value) => Some(timestamp_from_db(value, "terms.mastered_at")?),
        None => None,
    };

    let term = Term {
        uuid,
        owner,
        source: row.get("source")?,
        translation: row.get("translation")?,
        example: row.get("example")?,
        tags: load_tags(conn, &uuid_text)?,
        starred,
        stage,
        next_review: date_from_db(&next_review_text, "terms.next_review")?,
        mastered_at,
        created_at: timestamp_from_db(row.get("created_at")?, "terms.created_at")?,
    };
    term.validate()?;
    Ok(term)
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<ReviewEvent> {
    let uuid_text: String = row.get("uuid")?;
    let term_text: String = row.get("term_uuid")?;
    let owner = match row.get::<_, Option<String>>("user_uuid")? {
        Some(value) => Some(uuid_from_db(&value, "reviews.user_uuid")?),
        None => None,
    };
    let outcome_text: String = row.get("outcome")?;
    let outcome = outcome_text.parse::<ReviewOutcome>().map_err(|_| {
        RepoError::InvalidData(format!("invalid outcome `{outcome_text}` in reviews.outcome"))
    })?;
    let assigned_text: String = row.get("next_review_assigned")?;

    Ok(ReviewEvent {
        uuid: uuid_from_db(&uuid_text, "reviews.uuid")?,
        term_id: uuid_from_db(&term_text, "reviews.term_uuid")?,
        owner,
        outcome,
        reviewed_at: timestamp_from_db(row.get("reviewed_at")?, "reviews.reviewed_at")?,
        next_review_assigned: date_from_db(&assigned_text, "reviews.next_review_assigned")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, normalize_due_limit, normalize_term_limit};

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn limits_default_and_cap() {
        assert_eq!(normalize_term_limit(None), 50);
        assert_eq!(normalize_term_limit(Some(1_000)), 200);
        assert_eq!(normalize_due_limit(Some(0)), 20);
        assert_eq!(normalize_due_limit(Some(7)), 7);
    }
}
