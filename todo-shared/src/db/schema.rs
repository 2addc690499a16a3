/// Schema bootstrap
///
/// The database has exactly two tables and no versioning. Both are created
/// with `IF NOT EXISTS` on every startup, so running [`init_schema`] against
/// an existing file is a no-op.
///
/// # Tables
///
/// ```sql
/// todos (id, title, done, created_at)
/// users (id, username UNIQUE, email UNIQUE, password_hash, created_at)
/// ```

use sqlx::SqlitePool;
use tracing::{debug, info};

const CREATE_TODOS: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        done INTEGER NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Names of every table the application owns
pub const TABLES: [&str; 2] = ["todos", "users"];

/// Creates the `todos` and `users` tables if they are absent
///
/// # Errors
///
/// Returns an error if either statement fails to execute
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Initializing database schema");

    for statement in [CREATE_TODOS, CREATE_USERS] {
        sqlx::query(statement).execute(pool).await?;
    }

    debug!(tables = ?TABLES, "Schema ready");
    Ok(())
}

/// Returns whether `table` exists in the connected database
///
/// # Errors
///
/// Returns an error if the catalog query fails
pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}
