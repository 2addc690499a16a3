/// Todo endpoints
///
/// # Endpoints
///
/// - `GET    /todos`     - List todos, newest first
/// - `GET    /todos/:id` - Fetch one todo
/// - `POST   /todos`     - Create a todo
/// - `PUT    /todos/:id` - Partially update a todo
/// - `DELETE /todos/:id` - Delete a todo
///
/// Every handler issues its storage calls one after another; none of them
/// run inside a transaction.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{JsonBody, TodoId},
    routes::non_empty,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use todo_shared::models::Todo;
use tracing::{debug, info};

/// Create request
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
}

/// Partial update request
///
/// `done` accepts any JSON value and is reduced to a boolean by
/// [`is_truthy`]. An explicit `null` counts as present (and false).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub done: Option<Value>,
}

/// Wraps whatever value is present, `null` included, in `Some`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON truthiness: `false`, `null`, `0` and `""` are false, everything
/// else (including empty arrays and objects) is true
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// List all todos, most recently created first
pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<Todo>>> {
    let todos = Todo::list(&state.db).await?;
    debug!(count = todos.len(), "Listed todos");

    Ok(Json(todos))
}

/// Fetch a single todo
///
/// # Errors
///
/// - `404 Not Found`: No todo with that id
pub async fn get_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> ApiResult<Json<Todo>> {
    let todo = Todo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(todo))
}

/// Create a todo
///
/// # Endpoint
///
/// ```text
/// POST /todos
/// Content-Type: application/json
///
/// { "title": "buy milk" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `title` missing or empty
pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let title = non_empty(req.title)
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;

    let outcome = Todo::insert(&state.db, &title).await?;

    let todo = Todo::find_by_id(&state.db, outcome.generated_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "todo {} missing right after insert",
                outcome.generated_id
            ))
        })?;

    info!(todo_id = todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Partially update a todo
///
/// `title` and `done` are applied independently, only when present. A body
/// with neither returns the row unchanged.
///
/// # Endpoint
///
/// ```text
/// PUT /todos/:id
/// Content-Type: application/json
///
/// { "done": true }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No todo with that id (checked first)
/// - `400 Bad Request`: `title` present but empty
pub async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    JsonBody(req): JsonBody<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    if !Todo::exists(&state.db, id).await? {
        return Err(ApiError::not_found());
    }

    if req.title.as_deref() == Some("") {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    if let Some(title) = &req.title {
        Todo::update_title(&state.db, id, title).await?;
    }

    if let Some(done) = &req.done {
        Todo::update_done(&state.db, id, is_truthy(done)).await?;
    }

    // Deleted between the existence check and here
    let todo = Todo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    debug!(todo_id = id, "Todo updated");

    Ok(Json(todo))
}

/// Delete a todo
///
/// # Errors
///
/// - `404 Not Found`: No todo with that id (including one already deleted)
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> ApiResult<StatusCode> {
    if !Todo::delete(&state.db, id).await? {
        return Err(ApiError::not_found());
    }

    info!(todo_id = id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}
