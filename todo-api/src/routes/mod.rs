/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness probe
/// - `auth`: User registration
/// - `todos`: Todo CRUD

pub mod auth;
pub mod health;
pub mod todos;

/// Keeps a field only when it is present and non-empty
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
