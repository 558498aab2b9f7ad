//! AI endpoints: issue classification, implementation guides, repository overviews.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::api::dto::{
    ClassifyIssuesRequest, ClassifyIssuesResponse, ImplementationGuideRequest,
    RepoOverviewRequest,
};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::models::{ImplementationGuide, RepoOverviewResult};
use crate::state::AppState;

pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/classify-issues", post(classify_issues))
        .route("/implementation-guide", post(implementation_guide))
        .route("/repo-overview", post(repo_overview))
}

/// POST /api/classify-issues
///
/// Always succeeds for a valid body; issues the model could not classify
/// carry a fallback analysis.
async fn classify_issues(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ClassifyIssuesRequest>,
) -> Json<ClassifyIssuesResponse> {
    let issues = state
        .services
        .ai
        .classify_issues(&payload.repo_context, payload.issues)
        .await;
    Json(ClassifyIssuesResponse {
        success: true,
        issues,
    })
}

/// POST /api/implementation-guide
async fn implementation_guide(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ImplementationGuideRequest>,
) -> Result<Json<ImplementationGuide>, AppError> {
    let guide = state
        .services
        .ai
        .implementation_guide(
            &payload.issue,
            &payload.repo_context,
            payload.ai_analysis.as_ref(),
        )
        .await?;
    Ok(Json(guide))
}

/// POST /api/repo-overview
///
/// A failed generation answers 500 with the fallback overview in the body.
async fn repo_overview(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RepoOverviewRequest>,
) -> (StatusCode, Json<RepoOverviewResult>) {
    let result = state.services.ai.repo_overview(&payload.repo_data).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(result))
}
