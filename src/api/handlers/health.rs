//! Health check endpoint handler.
//!
//! The cache never makes the service unhealthy: an unreachable backend is
//! reported as `degraded` while requests keep succeeding without it.

use axum::{Json, Router, extract::State, routing::get};
use jiff::Timestamp;

use crate::api::dto::{CacheHealth, HealthResponse, HealthStatus};
use crate::cache::ConnectionState;
use crate::state::AppState;

/// Creates health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /api/health
///
/// Reports the version and cache state. Does not touch the cache backend.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_state = state.cache.state();
    let status = match cache_state {
        ConnectionState::Errored => HealthStatus::Degraded,
        _ => HealthStatus::Healthy,
    };

    Json(HealthResponse {
        status,
        version: crate::pkg_version(),
        timestamp: Timestamp::now(),
        cache: CacheHealth {
            backend: state.cache.backend_name(),
            state: cache_state,
            stats: state.cache.stats(),
        },
    })
}
