// Handlers module
// HTTP handlers for the REST API

pub mod journal;
pub mod mood;

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::debug;

use crate::models::{StatusReport, UserProfile};

/// GET /
pub async fn welcome() -> impl IntoResponse {
    (StatusCode::OK, "Welcome to MoodTracker API!")
}

/// GET /api/user
pub async fn user_profile() -> impl IntoResponse {
    (StatusCode::OK, Json(UserProfile::owner()))
}

/// Status handler
/// GET /api/status
/// Reports liveness only; the store is not consulted.
pub async fn status() -> impl IntoResponse {
    (StatusCode::OK, Json(StatusReport::now()))
}

/// Fallback for unknown paths and unsupported methods on known paths
pub async fn not_found() -> impl IntoResponse {
    debug!("No route matched");
    (StatusCode::NOT_FOUND, "404 - Page Not Found")
}
