//! HTTP handlers.

pub mod health;
pub mod login;
pub mod metrics;
pub mod welcome;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for paths no route claims.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
