//! Error handler for converting AppError to HTTP responses.
//!
//! Every error leaves the API as an [`ErrorResponse`] JSON body. Upstream
//! and internal failures are logged here with their source chain, and only a
//! sanitized message reaches the client.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - BadRequest → 400 BAD_REQUEST
    /// - ValidationErrors → 400 BAD_REQUEST
    /// - ExternalApi → 502 BAD_GATEWAY
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found(entity, field, value),
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::ValidationErrors { errors } => ErrorResponse::validation(errors),
            AppError::ExternalApi { service, .. } => {
                tracing::error!(error = ?self, "Upstream request failed");
                ErrorResponse::new(
                    "EXTERNAL_API_ERROR",
                    &format!("Upstream service {} is unavailable", service),
                )
                .with_details(json!({ "service": service }))
            }
            AppError::Configuration { key, message } => {
                tracing::error!(key = %key, message = %message, "Configuration error");
                ErrorResponse::new("CONFIGURATION_ERROR", message)
                    .with_details(json!({ "key": key }))
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::BadRequest { .. } | AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::ExternalApi { .. } => StatusCode::BAD_GATEWAY,
        AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Rewrites non-JSON error responses produced outside the handlers
/// (unknown routes, wrong methods, extractor rejections) into [`ErrorResponse`].
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        return response;
    }

    let (_parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, 64 * 1024)
        .await
        .unwrap_or_default();
    let original_message = String::from_utf8_lossy(&body_bytes).trim().to_string();

    let code = status
        .canonical_reason()
        .unwrap_or("Unknown Error")
        .to_uppercase()
        .replace(' ', "_");
    let message = if original_message.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        original_message
    };

    let mut error_response = ErrorResponse::new(&code, &message);
    if let Some(RequestId(id)) = request_id {
        error_response = error_response.with_request_id(&id);
    }

    (status, Json(error_response)).into_response()
}
