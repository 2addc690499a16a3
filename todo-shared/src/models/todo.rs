/// Todo model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     done INTEGER NOT NULL DEFAULT 0,
///     created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
///
/// Each operation is a single statement. Multi-step flows (insert then
/// re-read, check then update) are sequenced by the caller.

use crate::db::{Database, ExecOutcome, StorageResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const TODO_COLUMNS: &str = "id, title, done, created_at";

/// A titled, completable task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Row id assigned by SQLite
    pub id: i64,

    /// Non-empty title
    pub title: String,

    /// Completion flag, stored as 0/1
    pub done: bool,

    /// Creation time (UTC, second precision)
    pub created_at: NaiveDateTime,
}

impl Todo {
    /// Lists all todos, most recently created first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(db: &Database) -> StorageResult<Vec<Self>> {
        db.query_many(
            &format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id DESC"),
            &[],
        )
        .await
    }

    /// Finds a todo by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_by_id(db: &Database, id: i64) -> StorageResult<Option<Self>> {
        db.query_one(
            &format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"),
            &[id.into()],
        )
        .await
    }

    /// Returns whether a todo with `id` exists
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists(db: &Database, id: i64) -> StorageResult<bool> {
        let found: Option<(i64,)> = db
            .query_one("SELECT id FROM todos WHERE id = ?", &[id.into()])
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a new, not yet done todo
    ///
    /// The new id is in [`ExecOutcome::generated_id`].
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert(db: &Database, title: &str) -> StorageResult<ExecOutcome> {
        db.execute(
            "INSERT INTO todos (title, done) VALUES (?, 0)",
            &[title.into()],
        )
        .await
    }

    /// Replaces the title of todo `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_title(db: &Database, id: i64, title: &str) -> StorageResult<ExecOutcome> {
        db.execute(
            "UPDATE todos SET title = ? WHERE id = ?",
            &[title.into(), id.into()],
        )
        .await
    }

    /// Sets the completion flag of todo `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_done(db: &Database, id: i64, done: bool) -> StorageResult<ExecOutcome> {
        db.execute(
            "UPDATE todos SET done = ? WHERE id = ?",
            &[done.into(), id.into()],
        )
        .await
    }

    /// Deletes todo `id`
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if no todo had that id
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn delete(db: &Database, id: i64) -> StorageResult<bool> {
        let outcome = db
            .execute("DELETE FROM todos WHERE id = ?", &[id.into()])
            .await?;

        Ok(outcome.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_todo_serializes_done_as_bool() {
        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        let todo = Todo {
            id: 7,
            title: "water plants".to_string(),
            done: false,
            created_at,
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "water plants");
        assert_eq!(json["done"], false);
        assert_eq!(json["created_at"], "2024-05-01T12:30:00");
    }
}
