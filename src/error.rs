use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// `message` is what the client sees; `source` is only logged.
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Adapter for `map_err`: wraps a store failure with the route's fixed message.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(message) => {
                tracing::debug!("Validation error: {}", message);
                message
            }
            ApiError::NotFound(message) => {
                tracing::debug!("Resource not found: {}", message);
                message
            }
            ApiError::Store { message, source } => {
                // Internal detail stays in the logs
                match source {
                    StoreError::Pool(ref err) => tracing::warn!("{} ({})", message, err),
                    ref err => tracing::error!("{} ({})", message, err),
                }
                message.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, serde_json::from_slice(&bytes).expect("Body is not JSON"))
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let (status, body) = body_of(ApiError::validation("Mood is required.")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Mood is required."}));
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let (status, body) = body_of(ApiError::not_found("Journal entry not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Journal entry not found"}));
    }

    #[tokio::test]
    async fn test_store_error_hides_detail() {
        let error = ApiError::store("Failed to save journal entry.")(StoreError::MissingField("entry"));
        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to save journal entry."}));
    }
}
