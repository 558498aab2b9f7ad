use async_trait::async_trait;

use super::types::{Issue, Repository, SearchResults};
use crate::error::AppResult;

/// Source of repository and issue metadata.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    async fn get_repository(&self, owner: &str, repo: &str) -> AppResult<Repository>;

    /// Repositories matching `query`, most starred first.
    async fn search_repositories(&self, query: &str, per_page: u32) -> AppResult<SearchResults>;

    /// Issues of a repository with pull requests filtered out.
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        state: &str,
        labels: Option<&str>,
    ) -> AppResult<Vec<Issue>>;

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> AppResult<Issue>;

    /// Raw README text, `None` when the repository has none.
    async fn get_readme(&self, owner: &str, repo: &str) -> AppResult<Option<String>>;
}
