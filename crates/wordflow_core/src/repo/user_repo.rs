//! User repository contracts and SQLite implementation.

use crate::model::user::{User, UserId};
use crate::repo::{
    ensure_tables, timestamp_from_db, timestamp_to_db, uuid_from_db, RepoError, RepoResult,
};
use rusqlite::{params, Connection, ErrorCode, Row};

pub trait UserRepository {
    /// Inserts one user. Fails with `DuplicateEmail` when the email exists.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Looks up by normalized (lowercase, trimmed) email.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let inserted = self.conn.execute(
            "INSERT INTO users (uuid, email, created_at) VALUES (?1, ?2, ?3);",
            params![
                user.uuid.to_string(),
                user.email.as_str(),
                timestamp_to_db(user.created_at),
            ],
        );

        match inserted {
            Ok(_) => Ok(user.uuid),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::DuplicateEmail)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, email, created_at FROM users WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, email, created_at FROM users WHERE email = ?1;")?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    Ok(User {
        uuid: uuid_from_db(&uuid_text, "users.uuid")?,
        email: row.get("email")?,
        created_at: timestamp_from_db(row.get("created_at")?, "users.created_at")?,
    })
}
