/// User model and database operations
///
/// Users are created once through registration and never updated or
/// deleted by the API.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// The UNIQUE constraints are the source of truth for uniqueness. A lookup
/// with [`User::find_conflicting`] before inserting only catches the common
/// case early; a concurrent registration can still lose at insert time, which
/// surfaces as a unique [`StorageError::ConstraintViolation`].
///
/// [`StorageError::ConstraintViolation`]: crate::db::StorageError::ConstraintViolation

use crate::db::{Database, ExecOutcome, StorageResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// User row, including credential material
///
/// Never serialize this to clients; use [`PublicUser`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Globally unique login name
    pub username: String,

    /// Globally unique email address
    pub email: String,

    /// Argon2id hash in PHC string format
    pub password_hash: String,

    pub created_at: NaiveDateTime,
}

/// Client-facing view of a user, without the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,

    /// Already hashed password (NOT plaintext!)
    pub password_hash: String,
}

impl User {
    /// Returns the id of a user that already holds `username` or `email`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_conflicting(
        db: &Database,
        username: &str,
        email: &str,
    ) -> StorageResult<Option<i64>> {
        let found: Option<(i64,)> = db
            .query_one(
                "SELECT id FROM users WHERE username = ? OR email = ?",
                &[username.into(), email.into()],
            )
            .await?;

        Ok(found.map(|(id,)| id))
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a unique constraint violation if the username or email is
    /// taken, or a query error for any other failure
    pub async fn insert(db: &Database, data: &NewUser) -> StorageResult<ExecOutcome> {
        db.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
            &[
                data.username.as_str().into(),
                data.email.as_str().into(),
                data.password_hash.as_str().into(),
            ],
        )
        .await
    }

    /// Finds the public view of user `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_public_by_id(db: &Database, id: i64) -> StorageResult<Option<PublicUser>> {
        db.query_one(
            "SELECT id, username, email, created_at FROM users WHERE id = ?",
            &[id.into()],
        )
        .await
    }

    /// Finds a full user row by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_by_username(db: &Database, username: &str) -> StorageResult<Option<Self>> {
        db.query_one(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
            &[username.into()],
        )
        .await
    }
}
