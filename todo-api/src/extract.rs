//! Custom Axum extractors
//!
//! Axum's built-in `Path` and `Json` extractors reject bad input with plain
//! text bodies. These wrappers reject with [`ApiError`] instead, so every
//! failure a client sees has the `{"error": ...}` shape.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Todo id taken from the `:id` path segment
///
/// An id that is not an integer cannot match any row, so it is rejected as
/// not found rather than as a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found())?;

        raw.parse::<i64>()
            .map(TodoId)
            .map_err(|_| ApiError::not_found())
    }
}

/// JSON request body that tolerates an empty payload
///
/// An empty (or whitespace-only) body deserializes as `T::default()`, which
/// lets handlers report the specific missing field instead of a parse error.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
    }
}
