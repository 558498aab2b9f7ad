use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::provider::RepositoryProvider;
use super::types::{Issue, Repository, SearchResults};
use crate::config::GitHubConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::build_http_client;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Issues fetched per listing, enough for one classification batch.
const ISSUES_PER_PAGE: u32 = 30;

pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> AppResult<Self> {
        let http = build_http_client(Duration::from_secs(config.timeout), &config.user_agent)?;
        let token = Some(config.token.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        if token.is_none() {
            tracing::warn!("No GitHub token configured, requests are subject to anonymous rate limits");
        }

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::ExternalApi {
            service: "github".into(),
            message: message.into(),
            source,
        }
    }

    /// API URL for the given path segments. Each segment is percent-encoded,
    /// so a `/` or `?` inside an owner or repository name stays in its segment.
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url).map_err(|e| {
            Self::make_error(format!("invalid API URL {}: {}", self.api_url, e), Some(e.into()))
        })?;

        url.path_segments_mut()
            .map_err(|_| Self::make_error(format!("API URL {} has no path", self.api_url), None))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Send a GET request; `Ok(None)` means the upstream answered 404.
    async fn fetch(
        &self,
        operation: &str,
        url: Url,
        accept: &str,
    ) -> AppResult<Option<reqwest::Response>> {
        let mut request = self.http.get(url).header(ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let resp = request.send().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("{} request failed: {}", operation, e), Some(e.into()))
        })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = resp.error_for_status().map_err(|e: reqwest::Error| {
            Self::make_error(format!("{} HTTP error: {}", operation, e), Some(e.into()))
        })?;

        Ok(Some(resp))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: Url,
    ) -> AppResult<Option<T>> {
        let Some(resp) = self.fetch(operation, url, JSON_MEDIA_TYPE).await? else {
            return Ok(None);
        };

        let data = resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("{} invalid JSON: {}", operation, e), Some(e.into()))
        })?;

        Ok(Some(data))
    }
}

#[async_trait]
impl RepositoryProvider for GitHubClient {
    async fn get_repository(&self, owner: &str, repo: &str) -> AppResult<Repository> {
        let operation = format!("get_repository({}/{})", owner, repo);
        let url = self.endpoint(&["repos", owner, repo], &[])?;

        self.fetch_json(&operation, url)
            .await?
            .ok_or_else(|| AppError::not_found("Repository", "full_name", format!("{}/{}", owner, repo)))
    }

    async fn search_repositories(&self, query: &str, per_page: u32) -> AppResult<SearchResults> {
        let operation = format!("search_repositories({})", query);
        let url = self.endpoint(
            &["search", "repositories"],
            &[
                ("q", query.to_string()),
                ("sort", "stars".to_string()),
                ("order", "desc".to_string()),
                ("per_page", per_page.to_string()),
            ],
        )?;

        // The search endpoint has no 404 of its own; treat one as an upstream fault.
        self.fetch_json(&operation, url)
            .await?
            .ok_or_else(|| Self::make_error(format!("{} HTTP error: 404", operation), None))
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        state: &str,
        labels: Option<&str>,
    ) -> AppResult<Vec<Issue>> {
        let operation = format!("list_issues({}/{})", owner, repo);
        let mut params = vec![
            ("state", state.to_string()),
            ("per_page", ISSUES_PER_PAGE.to_string()),
        ];
        if let Some(labels) = labels.filter(|l| !l.is_empty()) {
            params.push(("labels", labels.to_string()));
        }
        let url = self.endpoint(&["repos", owner, repo, "issues"], &params)?;

        let issues: Vec<Issue> = self
            .fetch_json(&operation, url)
            .await?
            .ok_or_else(|| AppError::not_found("Repository", "full_name", format!("{}/{}", owner, repo)))?;

        Ok(issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .collect())
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> AppResult<Issue> {
        let operation = format!("get_issue({}/{}#{})", owner, repo, number);
        let url = self.endpoint(&["repos", owner, repo, "issues", number.to_string().as_str()], &[])?;

        self.fetch_json(&operation, url).await?.ok_or_else(|| {
            AppError::not_found("Issue", "number", format!("{}/{}#{}", owner, repo, number))
        })
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> AppResult<Option<String>> {
        let operation = format!("get_readme({}/{})", owner, repo);
        let url = self.endpoint(&["repos", owner, repo, "readme"], &[])?;

        let Some(resp) = self.fetch(&operation, url, RAW_MEDIA_TYPE).await? else {
            return Ok(None);
        };

        let text = resp.text().await.map_err(|e: reqwest::Error| {
            Self::make_error(format!("{} invalid body: {}", operation, e), Some(e.into()))
        })?;

        Ok(Some(text))
    }
}
