//! Repository and issue metadata, memoized per upstream resource.

use std::sync::Arc;

use crate::cache::{CacheManager, SEARCH_RESULTS_TTL};
use crate::cache_key;
use crate::error::{AppError, AppResult};
use crate::external::github::{Issue, RepositoryProvider, SearchResults};
use crate::models::RepositorySummary;

const ISSUE_STATES: &[&str] = &["open", "closed", "all"];
pub const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;
const MAX_NAME_LEN: usize = 100;

/// Owner and repository names as GitHub allows them. Anything else would
/// smuggle separators into the upstream path or the cache key.
fn check_names(owner: &str, name: &str) -> AppResult<()> {
    for (kind, value) in [("owner", owner), ("repository", name)] {
        let valid = !value.is_empty()
            && value.len() <= MAX_NAME_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(AppError::bad_request(format!(
                "Invalid {} name '{}'",
                kind, value
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct RepoService {
    provider: Arc<dyn RepositoryProvider>,
    cache: CacheManager,
}

impl RepoService {
    pub fn new(provider: Arc<dyn RepositoryProvider>, cache: CacheManager) -> Self {
        Self { provider, cache }
    }

    /// Repository summary with its README.
    pub async fn repository(&self, owner: &str, name: &str) -> AppResult<RepositorySummary> {
        check_names(owner, name)?;
        let key = cache_key!("repo", owner, name);
        self.cache
            .compute_if_absent(&key, None, || async {
                let (repo, readme) = tokio::try_join!(
                    self.provider.get_repository(owner, name),
                    self.provider.get_readme(owner, name),
                )?;
                Ok::<_, AppError>(RepositorySummary::from_repository(repo, readme))
            })
            .await
    }

    pub async fn search(&self, query: &str, per_page: Option<u32>) -> AppResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::bad_request("Search query must not be empty"));
        }
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

        let key = cache_key!("search", query, per_page);
        self.cache
            .compute_if_absent(&key, Some(SEARCH_RESULTS_TTL), || {
                self.provider.search_repositories(query, per_page)
            })
            .await
    }

    pub async fn issues(
        &self,
        owner: &str,
        name: &str,
        state: Option<&str>,
        labels: Option<&str>,
    ) -> AppResult<Vec<Issue>> {
        check_names(owner, name)?;
        let state = state.unwrap_or("open");
        if !ISSUE_STATES.contains(&state) {
            return Err(AppError::bad_request(format!(
                "Invalid issue state '{}'. Valid states are: {}",
                state,
                ISSUE_STATES.join(", ")
            )));
        }
        let labels = labels.map(str::trim).filter(|l| !l.is_empty());

        let key = cache_key!("issues", owner, name, state, labels.unwrap_or_default());
        self.cache
            .compute_if_absent(&key, None, || {
                self.provider.list_issues(owner, name, state, labels)
            })
            .await
    }

    /// A single issue. Pull requests are rejected and never cached.
    pub async fn issue(&self, owner: &str, name: &str, number: u64) -> AppResult<Issue> {
        check_names(owner, name)?;
        let key = cache_key!("issue", owner, name, number);
        self.cache
            .compute_if_absent(&key, None, || async {
                let issue = self.provider.get_issue(owner, name, number).await?;
                if issue.is_pull_request() {
                    return Err(AppError::bad_request(format!(
                        "#{} in {}/{} is a pull request, not an issue",
                        number, owner, name
                    )));
                }
                Ok(issue)
            })
            .await
    }

    /// Drop the cached summary so the next read refetches it.
    pub async fn invalidate_repository(&self, owner: &str, name: &str) {
        self.cache.delete(&cache_key!("repo", owner, name)).await;
    }
}
