// Journal handlers
// HTTP handlers for journal entry operations

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{JournalFilter, JournalQuery, JournalWriteRequest},
    store::{SharedStore, StoreError},
};

const MISSING_FIELDS: &str = "At least one of title or entry is required.";
const NOT_FOUND: &str = "Journal entry not found";

/// Missing or unparseable bodies behave like `{}`.
fn write_request(body: Option<Json<JournalWriteRequest>>) -> Result<JournalWriteRequest, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    if !request.has_content() {
        return Err(ApiError::validation(MISSING_FIELDS));
    }

    Ok(request)
}

/// Get all journal entries, optionally filtered
/// GET /api/journal?title=<text>
/// The filter is a case-insensitive substring match on title or entry.
/// A query string that cannot be read as a single `title` fails like the store would.
pub async fn list_entries(
    State(store): State<SharedStore>,
    query: Result<Query<JournalQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    const FAILED: &str = "Failed to retrieve journal entries.";

    let Query(params) =
        query.map_err(|rejection| ApiError::store(FAILED)(StoreError::InvalidFilter(rejection.body_text())))?;
    let filter = JournalFilter::from_query(&params);

    if let JournalFilter::Contains(ref needle) = filter {
        info!("Searching journal entries for: {}", needle);
    } else {
        info!("Fetching all journal entries");
    }

    let entries = store
        .find(&filter)
        .await
        .map_err(ApiError::store(FAILED))?;

    info!("Retrieved {} journal entries", entries.len());
    Ok((StatusCode::OK, Json(entries)))
}

/// Get journal entry by ID
/// GET /api/journal/:id
pub async fn get_entry(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Fetching journal entry with id: {}", id);

    let entry = store
        .find_by_id(&id)
        .await
        .map_err(ApiError::store("Invalid ID or entry not found."))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok((StatusCode::OK, Json(entry)))
}

/// Create a new journal entry
/// POST /api/journal
/// The store requires both fields, so a single-field body passes validation
/// here but fails on insert with a 500.
pub async fn create_entry(
    State(store): State<SharedStore>,
    body: Option<Json<JournalWriteRequest>>,
) -> ApiResult<impl IntoResponse> {
    let request = write_request(body)?;

    const FAILED: &str = "Failed to save journal entry.";
    let new_entry = request.into_new_entry().map_err(ApiError::store(FAILED))?;
    let entry = store.insert(new_entry).await.map_err(ApiError::store(FAILED))?;

    info!("Successfully created journal entry with id: {}", entry.id);
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Journal saved.", "entry": entry })),
    ))
}

/// Update journal entry by ID
/// PUT /api/journal/:id
pub async fn update_entry(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Option<Json<JournalWriteRequest>>,
) -> ApiResult<impl IntoResponse> {
    let request = write_request(body)?;
    info!("Updating journal entry with id: {}", id);

    const FAILED: &str = "Failed to update journal entry.";
    let patch = request.into_patch().map_err(ApiError::store(FAILED))?;
    let entry = store
        .update_by_id(&id, patch)
        .await
        .map_err(ApiError::store(FAILED))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Successfully updated journal entry with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Journal entry updated.", "entry": entry })),
    ))
}

/// Delete journal entry by ID
/// DELETE /api/journal/:id
pub async fn delete_entry(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Deleting journal entry with id: {}", id);

    let entry = store
        .delete_by_id(&id)
        .await
        .map_err(ApiError::store("Failed to delete journal entry."))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Successfully deleted journal entry with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Journal entry deleted.", "entry": entry })),
    ))
}
