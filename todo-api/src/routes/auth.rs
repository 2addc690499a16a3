/// Registration endpoint
///
/// Creates a user account. No token or session is issued, and there is no
/// login route.
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, DUPLICATE_USER_MESSAGE},
    extract::JsonBody,
    routes::non_empty,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use todo_shared::{
    auth::password,
    models::{NewUser, PublicUser, User},
};
use tracing::{debug, info, warn};

const MISSING_FIELDS_MESSAGE: &str = "username, email, and password are required";

/// Register request
///
/// All three fields are required and must be non-empty.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "ada",
///   "email": "ada@example.com",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": 1,
///   "username": "ada",
///   "email": "ada@example.com",
///   "created_at": "2024-05-01T12:30:00"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: A field is missing or empty
/// - `409 Conflict`: Username or email already taken
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let (Some(username), Some(email), Some(password)) = (
        non_empty(req.username),
        non_empty(req.email),
        non_empty(req.password),
    ) else {
        return Err(ApiError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    };

    debug!(%username, %email, "Register attempt");

    if let Some(existing_id) = User::find_conflicting(&state.db, &username, &email).await? {
        debug!(existing_id, "Username or email already registered");
        return Err(ApiError::Conflict(DUPLICATE_USER_MESSAGE.to_string()));
    }

    // Argon2 is deliberately slow; keep it off the async workers
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&password)).await??;

    // A concurrent registration may have claimed the name since the lookup;
    // the UNIQUE constraint decides.
    let outcome = User::insert(
        &state.db,
        &NewUser {
            username,
            email,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            warn!(error = %e, "Registration lost a uniqueness race");
        }
        ApiError::from(e)
    })?;

    let user = User::find_public_by_id(&state.db, outcome.generated_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "user {} missing right after insert",
                outcome.generated_id
            ))
        })?;

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}
