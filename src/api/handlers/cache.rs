//! Cache administration.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
};

use crate::state::AppState;

pub fn cache_routes() -> Router<AppState> {
    Router::new().route("/cache/{*key}", delete(delete_key))
}

/// DELETE /api/cache/{*key}
///
/// Removes one entry by its full key, e.g. `/api/cache/issue:a:b:7`.
/// Idempotent: 204 whether or not the key existed or the backend answered.
async fn delete_key(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    state.cache.delete(&key).await;
    StatusCode::NO_CONTENT
}
