//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::settings::ServerConfig;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware - generates/propagates request IDs
/// 2. Logging middleware - logs requests inside a span carrying the request ID
/// 3. CORS and response compression
/// 4. Global error handler - turns bare error responses into JSON
/// 5. Request timeout
///
/// # Routes
/// - `/api/health` - Health and cache status
/// - `/api/search`, `/api/repos/...` - Repository and issue metadata
/// - `/api/classify-issues`, `/api/implementation-guide`, `/api/repo-overview` - AI features
/// - `/api/cache/{*key}` - Cache invalidation
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .merge(handlers::health::health_routes())
        .merge(handlers::repos::repo_routes())
        .merge(handlers::ai::ai_routes())
        .merge(handlers::cache::cache_routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout),
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(cors)
        // Logging runs after request_id has set the ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::cache::{
        CacheBackend, CacheConfig, CacheManager, MemoryCacheConfig, MemoryStore, RedisCacheConfig,
    };
    use crate::services::Services;
    use crate::services::testing::{FakeGenerator, FakeProvider};

    fn memory_cache() -> CacheManager {
        CacheManager::with_store(Arc::new(MemoryStore::new(&MemoryCacheConfig::default())))
    }

    fn app_with(cache: CacheManager, generator: FakeGenerator) -> (Router, Arc<FakeProvider>) {
        let provider = Arc::new(FakeProvider::default());
        let services = Services::new(provider.clone(), Arc::new(generator), cache.clone());
        let router = create_router(AppState::new(services, cache), &ServerConfig::default());
        (router, provider)
    }

    fn app() -> (Router, Arc<FakeProvider>) {
        app_with(memory_cache(), FakeGenerator::unconfigured())
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app();
        let (status, body) = send(&router, get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["cache"]["backend"], "memory");
        assert_eq!(body["cache"]["state"], "ready");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_repository_is_served_from_cache() {
        let (router, provider) = app();

        let response = router.clone().oneshot(get("/api/repos/a/b")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let (status, body) = send(&router, get("/api/repos/a/b")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "a/b");
        assert_eq!(provider.calls(), 1);

        let (_, health) = send(&router, get("/api/health")).await;
        assert_eq!(health["cache"]["stats"]["hits"], 1);
        assert_eq!(health["cache"]["stats"]["misses"], 1);
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let (router, provider) = app();

        let (status, body) = send(&router, get("/api/repos/a/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) = send(&router, get("/api/repos/a/b/issues/99")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");

        let (status, _) = send(&router, get("/api/search?q=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        provider.set_failing(true);
        let (status, body) = send(&router, get("/api/repos/a/c")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["details"]["service"], "github");
    }

    #[tokio::test]
    async fn test_search_and_issues() {
        let (router, _) = app();

        let (status, body) = send(&router, get("/api/search?q=rust&per_page=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &router,
            get("/api/repos/a/b/issues?state=open&labels=good%20first%20issue"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, _) = send(&router, get("/api/repos/a/b/issues?state=merged")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cache_invalidation() {
        let (router, provider) = app();

        send(&router, get("/api/repos/a/b")).await;

        let (status, body) = send(&router, delete("/api/cache/repo:a:b")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        // Deleting again is still 204.
        let (status, _) = send(&router, delete("/api/cache/repo:a:b")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        send(&router, get("/api/repos/a/b")).await;
        assert_eq!(provider.calls(), 2);

        let (status, _) = send(&router, delete("/api/repos/a/b/cache")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        send(&router, get("/api/repos/a/b")).await;
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_classify_issues() {
        let (router, _) = app();

        let (status, body) = send(
            &router,
            post_json(
                "/api/classify-issues",
                json!({
                    "repoContext": {"name": "a/b"},
                    "issues": [{"number": 1, "title": "Fix typo", "labels": ["docs"], "body": ""}]
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["issues"][0]["number"], 1);
        assert_eq!(body["issues"][0]["ai_analysis"]["difficulty"], "medium");
        assert_eq!(
            body["issues"][0]["ai_analysis"]["summary"],
            "AI classification unavailable"
        );
    }

    #[tokio::test]
    async fn test_classify_issues_validation() {
        let (router, _) = app();

        let (status, body) = send(
            &router,
            post_json(
                "/api/classify-issues",
                json!({
                    "repoContext": {"name": ""},
                    "issues": [{"number": 1, "title": ""}]
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        let fields: Vec<&str> = body["details"]["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["issues[0].title", "repo_context.name"]);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/classify-issues")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_implementation_guide() {
        let (router, _) = app_with(memory_cache(), FakeGenerator::replying("1. Read the code"));
        let request = || {
            post_json(
                "/api/implementation-guide",
                json!({
                    "issue": {"number": 7, "title": "Add flag", "labels": [{"name": "cli"}]},
                    "repoContext": {"name": "a/b"}
                }),
            )
        };

        let (status, body) = send(&router, request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["guide"], "1. Read the code");
        assert!(body["generated_at"].is_string());

        let (router, _) = app();
        let (status, body) = send(&router, request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_repo_overview_fallback() {
        let (router, _) = app_with(memory_cache(), FakeGenerator::failing());

        let (status, body) = send(
            &router,
            post_json(
                "/api/repo-overview",
                json!({"repoData": {"full_name": "a/b", "description": "A tool"}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["overview"]["quick_context"]["what"], "A tool");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json() {
        let (router, _) = app();
        let request = Request::builder()
            .uri("/api/nope")
            .header(REQUEST_ID_HEADER, "req-1")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-1");
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_open() {
        let config = CacheConfig {
            enabled: true,
            backend: CacheBackend::Redis,
            redis: RedisCacheConfig {
                url: "redis://127.0.0.1:1".to_string(),
                connection_timeout: 1,
                ..RedisCacheConfig::default()
            },
            ..CacheConfig::default()
        };
        let (router, provider) = app_with(CacheManager::new(&config), FakeGenerator::unconfigured());

        let (status, body) = send(&router, get("/api/repos/a/b")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "a/b");

        send(&router, get("/api/repos/a/b")).await;
        assert_eq!(provider.calls(), 2);

        let (_, health) = send(&router, get("/api/health")).await;
        assert_eq!(health["status"], "degraded");
        assert_eq!(health["cache"]["backend"], "redis");
        assert_eq!(health["cache"]["state"], "errored");
    }
}
