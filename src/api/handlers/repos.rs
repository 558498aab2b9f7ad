//! Repository, issue and search handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::api::dto::{IssueListParams, SearchParams};
use crate::error::AppError;
use crate::external::github::{Issue, SearchResults};
use crate::models::RepositorySummary;
use crate::state::AppState;

/// Routes:
/// - GET    /search
/// - GET    /repos/{owner}/{repo}
/// - DELETE /repos/{owner}/{repo}/cache
/// - GET    /repos/{owner}/{repo}/issues
/// - GET    /repos/{owner}/{repo}/issues/{number}
pub fn repo_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/repos/{owner}/{repo}", get(get_repository))
        .route("/repos/{owner}/{repo}/cache", delete(invalidate_repository))
        .route("/repos/{owner}/{repo}/issues", get(list_issues))
        .route("/repos/{owner}/{repo}/issues/{number}", get(get_issue))
}

/// GET /api/search?q=&per_page=
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let results = state.services.repos.search(&params.q, params.per_page).await?;
    Ok(Json(results))
}

/// GET /api/repos/{owner}/{repo}
async fn get_repository(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<RepositorySummary>, AppError> {
    let summary = state.services.repos.repository(&owner, &repo).await?;
    Ok(Json(summary))
}

/// DELETE /api/repos/{owner}/{repo}/cache
///
/// Idempotent; 204 whether or not a summary was cached.
async fn invalidate_repository(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> StatusCode {
    state.services.repos.invalidate_repository(&owner, &repo).await;
    StatusCode::NO_CONTENT
}

/// GET /api/repos/{owner}/{repo}/issues?state=&labels=
async fn list_issues(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(params): Query<IssueListParams>,
) -> Result<Json<Vec<Issue>>, AppError> {
    let issues = state
        .services
        .repos
        .issues(
            &owner,
            &repo,
            params.state.as_deref(),
            params.labels.as_deref(),
        )
        .await?;
    Ok(Json(issues))
}

/// GET /api/repos/{owner}/{repo}/issues/{number}
async fn get_issue(
    State(state): State<AppState>,
    Path((owner, repo, number)): Path<(String, String, u64)>,
) -> Result<Json<Issue>, AppError> {
    let issue = state.services.repos.issue(&owner, &repo, number).await?;
    Ok(Json(issue))
}
