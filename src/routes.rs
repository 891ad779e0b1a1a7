use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{
        journal::{create_entry, delete_entry, get_entry, list_entries, update_entry},
        mood::submit_mood,
        not_found, status, user_profile, welcome,
    },
    middleware::create_middleware_stack,
    store::SharedStore,
};

/// Build the router with every endpoint and the middleware stack.
/// Unsupported methods on known paths fall through to the same 404 as unknown paths.
pub fn create_router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(welcome).fallback(not_found))
        .route("/api/user", get(user_profile).fallback(not_found))
        .route("/api/status", get(status).fallback(not_found))
        .route("/api/mood", post(submit_mood).fallback(not_found))
        .route(
            "/api/journal",
            get(list_entries).post(create_entry).fallback(not_found),
        )
        .route(
            "/api/journal/:id",
            get(get_entry)
                .put(update_entry)
                .delete(delete_entry)
                .fallback(not_found),
        )
        .fallback(not_found)
        // Add shared state (store handle)
        .with_state(store)
        .layer(create_middleware_stack())
}
