/// Common test utilities for integration tests
///
/// Each [`TestContext`] owns a private in-memory database and a router
/// built on top of it, so tests never share rows.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use todo_api::app::{build_router, AppState};
use todo_shared::db::{Database, DatabaseConfig};
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: Database,
    pub app: Router,
}

/// Status and parsed JSON body of a response (`Value::Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let db = Database::open(&DatabaseConfig::in_memory()).await?;
        let app = build_router(AppState::new(db.clone()));

        Ok(TestContext { db, app })
    }

    /// Sends a request with an optional JSON body through the router
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a pre-built request through the router
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                panic!(
                    "Response body is not JSON ({}): {}",
                    e,
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        TestResponse { status, body }
    }

    /// Creates a todo through the API and returns its id
    pub async fn create_todo(&self, title: &str) -> i64 {
        let response = self
            .send("POST", "/todos", Some(serde_json::json!({ "title": title })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["id"].as_i64().expect("created todo has an id")
    }

    /// Number of rows in the todos table
    pub async fn todo_count(&self) -> i64 {
        let (count,): (i64,) = self
            .db
            .query_one("SELECT COUNT(*) FROM todos", &[])
            .await
            .unwrap()
            .unwrap();

        count
    }
}
