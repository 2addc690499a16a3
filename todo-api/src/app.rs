/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use todo_api::{app::{build_router, AppState}, config::Config};
/// use todo_shared::db::Database;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let db = Database::open(&config.pool_config()).await?;
/// let app = build_router(AppState::new(db));
///
/// let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::routes;
use axum::{
    routing::{get, post},
    Router,
};
use todo_shared::db::Database;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor. The database
/// handle is the only shared resource; it wraps a reference-counted pool.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway
    pub db: Database,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health
/// ├── POST   /auth/register
/// ├── GET    /todos
/// ├── POST   /todos
/// ├── GET    /todos/:id
/// ├── PUT    /todos/:id
/// └── DELETE /todos/:id
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS: any origin, method and header
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route(
            "/todos",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route(
            "/todos/:id",
            get(routes::todos::get_todo)
                .put(routes::todos::update_todo)
                .delete(routes::todos::delete_todo),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
