// Mood handler
// Stateless echo of the submitted mood

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::{error::ApiError, models::MoodRequest};

/// Echo the submitted mood back
/// POST /api/mood
/// A missing or unparseable body is treated as `{}`.
pub async fn submit_mood(
    body: Option<Json<MoodRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let message = request
        .reply()
        .ok_or_else(|| ApiError::validation("Mood is required."))?;

    info!("Mood received");
    Ok((StatusCode::OK, Json(json!({ "message": message }))))
}
