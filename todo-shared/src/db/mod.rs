/// Database layer
///
/// This module owns everything that touches SQLite directly.
///
/// # Modules
///
/// - `pool`: SQLite connection pool creation and health checks
/// - `schema`: Idempotent table creation run at startup
/// - `gateway`: The [`Database`] handle exposing `query_many`, `query_one`
///   and `execute`
///
/// # Example
///
/// ```no_run
/// use todo_shared::db::{Database, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db = Database::open(&DatabaseConfig::for_file("./data.db")).await?;
///     db.close().await;
///     Ok(())
/// }
/// ```

pub mod gateway;
pub mod pool;
pub mod schema;

pub use gateway::{ConstraintKind, Database, ExecOutcome, SqlParam, StorageError, StorageResult};
pub use pool::{DatabaseConfig, DatabaseLocation};
