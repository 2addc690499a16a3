/// Persistence gateway
///
/// [`Database`] is the only component with direct access to SQLite. Every
/// statement goes through one of three operations:
///
/// - [`Database::query_many`]: all matching rows, empty when nothing matches
/// - [`Database::query_one`]: the first matching row, or `None`
/// - [`Database::execute`]: insert/update/delete, reporting the generated
///   row id and the number of affected rows
///
/// Parameters are positional (`?`) and passed as a slice of [`SqlParam`].
/// Driver failures are normalized into [`StorageError`], with constraint
/// violations split out into their own variant so callers can react to a
/// duplicate key without inspecting error text.
///
/// # Example
///
/// ```no_run
/// use todo_shared::db::{Database, DatabaseConfig, SqlParam};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::open(&DatabaseConfig::in_memory()).await?;
///
/// let outcome = db
///     .execute("INSERT INTO todos (title, done) VALUES (?, 0)", &["write docs".into()])
///     .await?;
///
/// let title: Option<(String,)> = db
///     .query_one("SELECT title FROM todos WHERE id = ?", &[outcome.generated_id.into()])
///     .await?;
/// # Ok(())
/// # }
/// ```

use crate::db::{
    pool::{close_pool, create_pool, DatabaseConfig},
    schema::init_schema,
};
use sqlx::{
    error::ErrorKind,
    sqlite::{SqliteArguments, SqliteRow},
    Arguments, FromRow, SqlitePool,
};
use std::fmt;
use tracing::{info, trace};

/// Result alias for gateway operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Error returned by every gateway operation
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A table constraint rejected the statement
    #[error("constraint violation ({kind}): {message}")]
    ConstraintViolation {
        /// Which kind of constraint fired
        kind: ConstraintKind,

        /// Driver message, kept for logs
        message: String,
    },

    /// Any other driver failure
    #[error("database error: {0}")]
    Query(#[source] sqlx::Error),
}

/// Kind of constraint behind a [`StorageError::ConstraintViolation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    NotNull,
    ForeignKey,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Check => "check",
        };
        f.write_str(name)
    }
}

impl StorageError {
    /// True when a UNIQUE (or primary key) constraint rejected the statement
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            }
        )
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let kind = match db_err.kind() {
                ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                _ => None,
            };

            if let Some(kind) = kind {
                return StorageError::ConstraintViolation {
                    kind,
                    message: db_err.message().to_string(),
                };
            }
        }

        StorageError::Query(err)
    }
}

/// Positional statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Integer(i64),
    Text(String),
    Null,
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

/// Booleans are stored as `0` / `1`
impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Integer(i64::from(value))
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

/// Outcome of [`Database::execute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Row id assigned by the last INSERT; meaningless for UPDATE/DELETE
    pub generated_id: i64,

    /// Number of rows inserted, updated or deleted
    pub rows_affected: u64,
}

/// Handle to the application database
///
/// Cheap to clone; all clones share one connection pool. Open it once at
/// startup with [`Database::open`] and release it with [`Database::close`].
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and makes sure both tables exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// statements fail
    pub async fn open(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = create_pool(config).await?;
        init_schema(&pool).await?;

        info!("Database ready");
        Ok(Self { pool })
    }

    /// Runs a query and returns every matching row
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or a row cannot be decoded
    /// into `T`
    pub async fn query_many<T>(&self, sql: &str, params: &[SqlParam]) -> StorageResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        trace!(sql, params = params.len(), "query_many");

        let rows = sqlx::query_as_with::<_, T, _>(sql, bind_all(params))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Runs a query and returns the first matching row, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails or the row cannot be decoded
    /// into `T`
    pub async fn query_one<T>(&self, sql: &str, params: &[SqlParam]) -> StorageResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        trace!(sql, params = params.len(), "query_one");

        let row = sqlx::query_as_with::<_, T, _>(sql, bind_all(params))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Runs a statement that returns no rows
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConstraintViolation`] when a table constraint
    /// rejects the statement and [`StorageError::Query`] for anything else
    pub async fn execute(&self, sql: &str, params: &[SqlParam]) -> StorageResult<ExecOutcome> {
        trace!(sql, params = params.len(), "execute");

        let result = sqlx::query_with(sql, bind_all(params))
            .execute(&self.pool)
            .await?;

        Ok(ExecOutcome {
            generated_id: result.last_insert_rowid(),
            rows_affected: result.rows_affected(),
        })
    }

    /// Closes every pooled connection
    pub async fn close(&self) {
        close_pool(&self.pool).await;
    }
}

fn bind_all(params: &[SqlParam]) -> SqliteArguments<'_> {
    let mut args = SqliteArguments::default();

    for param in params {
        match param {
            SqlParam::Integer(value) => args.add(*value),
            SqlParam::Text(value) => args.add(value.as_str()),
            SqlParam::Null => args.add(Option::<i64>::None),
        }
    }

    args
}
