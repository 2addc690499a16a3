/// SQLite connection pool management
///
/// Builds a `sqlx` SQLite pool over a single database file (created on first
/// use) and verifies it with a health check before handing it out.
///
/// # Example
///
/// ```no_run
/// use todo_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(&DatabaseConfig::for_file("./data.db")).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT ?")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     Ok(())
/// }
/// ```

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use tracing::{debug, info, warn};

/// Connection string for a private in-memory database
const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Where the database lives
///
/// File paths are handed to SQLite as-is, never spliced into a URL, so `%`
/// and `?` in a file name stay literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Single database file, created on first connect
    File(PathBuf),

    /// Private in-memory database
    InMemory,
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
            DatabaseLocation::InMemory => f.write_str(IN_MEMORY_URL),
        }
    }
}

/// Configuration for the database connection pool
///
/// Timeouts are in seconds so they can be read straight from environment
/// variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file or in-memory database
    pub location: DatabaseLocation,

    /// Maximum number of connections in the pool
    ///
    /// SQLite serializes writers internally, so a small pool is enough.
    pub max_connections: u32,

    /// Minimum number of connections kept open
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed (seconds)
    ///
    /// None = idle connections are never reaped
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before it is recycled (seconds)
    pub max_lifetime_seconds: Option<u64>,

    /// How long a statement waits on a locked database before failing (seconds)
    pub busy_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            location: DatabaseLocation::File(PathBuf::from("data.db")),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            busy_timeout_seconds: 5,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a database file at `path`
    ///
    /// The file is created on first connect if it does not exist.
    pub fn for_file(path: impl AsRef<Path>) -> Self {
        Self {
            location: DatabaseLocation::File(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    /// Configuration for a throwaway in-memory database
    ///
    /// The pool is pinned to a single connection that never expires: an
    /// in-memory database disappears together with its last connection.
    pub fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::InMemory,
            max_connections: 1,
            min_connections: 1,
            idle_timeout_seconds: None,
            max_lifetime_seconds: None,
            ..Default::default()
        }
    }
}

/// Creates and initializes a SQLite connection pool
///
/// This function:
/// 1. Builds connect options for the file (or in-memory database)
/// 2. Creates a pool with the specified configuration
/// 3. Performs a health check to verify the database responds
///
/// # Errors
///
/// Returns an error if the file cannot be opened or created, or the health
/// check fails.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(
        location = %config.location,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Creating database connection pool"
    );

    let connect_options = match &config.location {
        DatabaseLocation::File(path) => SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true),
        DatabaseLocation::InMemory => SqliteConnectOptions::from_str(IN_MEMORY_URL)?,
    }
        .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(config.idle_timeout_seconds.map(Duration::from_secs))
        .max_lifetime(config.max_lifetime_seconds.map(Duration::from_secs))
        .connect_with(connect_options)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// # Errors
///
/// Returns an error if the probe query fails or returns an unexpected value
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i64,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
///
/// Call during shutdown so pending writes are flushed and file handles
/// released.
pub async fn close_pool(pool: &SqlitePool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(
            config.location,
            DatabaseLocation::File(PathBuf::from("data.db"))
        );
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.idle_timeout_seconds, Some(600));
        assert_eq!(config.max_lifetime_seconds, Some(1800));
    }

    #[test]
    fn test_database_config_for_file() {
        let config = DatabaseConfig::for_file("./var/todos.db");
        assert_eq!(
            config.location,
            DatabaseLocation::File(PathBuf::from("./var/todos.db"))
        );
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_database_config_in_memory_is_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.location, DatabaseLocation::InMemory);
        assert_eq!(config.max_connections, 1);
        assert!(config.idle_timeout_seconds.is_none());
        assert!(config.max_lifetime_seconds.is_none());
    }

    #[tokio::test]
    async fn test_create_pool_in_memory() {
        let pool = create_pool(&DatabaseConfig::in_memory())
            .await
            .expect("in-memory pool should open");

        health_check(&pool).await.expect("health check should pass");
        close_pool(&pool).await;
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn test_file_name_is_taken_literally() {
        let dir = std::env::temp_dir().join(format!("todo-pool-literal-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        for name in ["data%41.db", "todos?v2.db"] {
            let pool = create_pool(&DatabaseConfig::for_file(dir.join(name)))
                .await
                .unwrap_or_else(|e| panic!("{} should open: {}", name, e));
            close_pool(&pool).await;
        }

        let mut created: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".db"))
            .collect();
        created.sort();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(created, vec!["data%41.db", "todos?v2.db"]);
    }

    #[tokio::test]
    async fn test_create_pool_in_missing_directory() {
        let config = DatabaseConfig {
            connect_timeout_seconds: 2,
            ..DatabaseConfig::for_file("/nonexistent-todo-dir/nested/data.db")
        };

        assert!(create_pool(&config).await.is_err());
    }
}
