/// Integration tests for the persistence gateway
///
/// Each test opens its own in-memory database, so they are independent and
/// need no external services.

use todo_shared::db::{ConstraintKind, Database, DatabaseConfig, SqlParam, StorageError};

async fn open_db() -> Database {
    Database::open(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database")
}

#[tokio::test]
async fn test_query_many_empty_is_not_an_error() {
    let db = open_db().await;

    let rows: Vec<(i64, String)> = db
        .query_many("SELECT id, title FROM todos", &[])
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_query_one_absent_returns_none() {
    let db = open_db().await;

    let row: Option<(i64,)> = db
        .query_one("SELECT id FROM todos WHERE id = ?", &[SqlParam::Integer(42)])
        .await
        .unwrap();

    assert!(row.is_none());
}

#[tokio::test]
async fn test_execute_reports_generated_id_and_rows_affected() {
    let db = open_db().await;

    let first = db
        .execute("INSERT INTO todos (title) VALUES (?)", &["one".into()])
        .await
        .unwrap();
    let second = db
        .execute("INSERT INTO todos (title) VALUES (?)", &["two".into()])
        .await
        .unwrap();

    assert_eq!(first.rows_affected, 1);
    assert_eq!(second.generated_id, first.generated_id + 1);

    let updated = db
        .execute("UPDATE todos SET done = ?", &[true.into()])
        .await
        .unwrap();
    assert_eq!(updated.rows_affected, 2);

    let deleted = db
        .execute("DELETE FROM todos WHERE id = ?", &[SqlParam::Integer(999)])
        .await
        .unwrap();
    assert_eq!(deleted.rows_affected, 0);
}

#[tokio::test]
async fn test_query_many_binds_params_in_order() {
    let db = open_db().await;

    for title in ["alpha", "beta", "gamma"] {
        db.execute("INSERT INTO todos (title) VALUES (?)", &[title.into()])
            .await
            .unwrap();
    }

    let rows: Vec<(String,)> = db
        .query_many(
            "SELECT title FROM todos WHERE title IN (?, ?) ORDER BY id",
            &["gamma".into(), "alpha".into()],
        )
        .await
        .unwrap();

    assert_eq!(rows, vec![("alpha".to_string(),), ("gamma".to_string(),)]);
}

#[tokio::test]
async fn test_unique_violation_is_classified() {
    let db = open_db().await;
    let insert = "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)";

    db.execute(insert, &["ada".into(), "ada@example.com".into(), "h".into()])
        .await
        .unwrap();

    let err = db
        .execute(insert, &["ada".into(), "other@example.com".into(), "h".into()])
        .await
        .unwrap_err();

    assert!(err.is_unique_violation(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_not_null_violation_is_not_unique() {
    let db = open_db().await;

    let err = db
        .execute("INSERT INTO todos (title) VALUES (?)", &[SqlParam::Null])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StorageError::ConstraintViolation {
            kind: ConstraintKind::NotNull,
            ..
        }
    ));
    assert!(!err.is_unique_violation());
}

#[tokio::test]
async fn test_invalid_sql_is_query_error() {
    let db = open_db().await;

    let err = db
        .query_many::<(i64,)>("SELECT id FROM no_such_table", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Query(_)));
}

#[tokio::test]
async fn test_reopening_file_database_keeps_rows() {
    let path = std::env::temp_dir().join(format!("todo-shared-reopen-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let db = Database::open(&DatabaseConfig::for_file(&path)).await.unwrap();
    db.execute("INSERT INTO todos (title) VALUES (?)", &["persisted".into()])
        .await
        .unwrap();
    db.close().await;

    let reopened = Database::open(&DatabaseConfig::for_file(&path)).await.unwrap();
    let titles: Vec<(String,)> = reopened
        .query_many("SELECT title FROM todos", &[])
        .await
        .unwrap();
    reopened.close().await;
    let _ = std::fs::remove_file(&path);

    assert_eq!(titles, vec![("persisted".to_string(),)]);
}
