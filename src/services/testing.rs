//! In-process fakes for the upstream providers, shared by service and router tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::external::ai::TextGenerator;
use crate::external::github::{Issue, Label, Owner, Repository, RepositoryProvider, SearchResults};

pub fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        id: 1,
        name: name.to_string(),
        full_name: format!("{}/{}", owner, name),
        owner: Owner {
            login: owner.to_string(),
            avatar_url: None,
        },
        description: Some("A test repository".to_string()),
        html_url: format!("https://github.com/{}/{}", owner, name),
        language: Some("Rust".to_string()),
        stargazers_count: 42,
        forks_count: 7,
        open_issues_count: 3,
        topics: vec!["testing".to_string()],
        updated_at: None,
    }
}

pub fn issue(number: u64) -> Issue {
    Issue {
        id: number,
        number,
        title: format!("Issue {}", number),
        body: Some("Something is broken".to_string()),
        state: "open".to_string(),
        html_url: format!("https://github.com/a/b/issues/{}", number),
        labels: vec![Label {
            name: "good first issue".to_string(),
            color: None,
        }],
        user: None,
        comments: 0,
        created_at: None,
        updated_at: None,
        pull_request: None,
    }
}

/// Repository provider returning canned data and counting upstream calls.
///
/// The repository `missing` does not exist and issue `99` is a pull request.
#[derive(Default)]
pub struct FakeProvider {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
}

impl FakeProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn enter(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external("github", "HTTP 503", None));
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryProvider for FakeProvider {
    async fn get_repository(&self, owner: &str, repo: &str) -> AppResult<Repository> {
        self.enter()?;
        if repo == "missing" {
            return Err(AppError::not_found(
                "Repository",
                "full_name",
                format!("{}/{}", owner, repo),
            ));
        }
        Ok(repository(owner, repo))
    }

    async fn search_repositories(&self, query: &str, per_page: u32) -> AppResult<SearchResults> {
        self.enter()?;
        let items: Vec<Repository> = (0..per_page.min(2))
            .map(|i| repository("search", &format!("{}-{}", query, i)))
            .collect();
        Ok(SearchResults {
            total_count: items.len() as u64,
            items,
        })
    }

    async fn list_issues(
        &self,
        _owner: &str,
        _repo: &str,
        _state: &str,
        _labels: Option<&str>,
    ) -> AppResult<Vec<Issue>> {
        self.enter()?;
        Ok(vec![issue(1), issue(2)])
    }

    async fn get_issue(&self, _owner: &str, _repo: &str, number: u64) -> AppResult<Issue> {
        self.enter()?;
        let mut issue = issue(number);
        if number == 99 {
            issue.pull_request = Some(serde_json::json!({ "url": "x" }));
        }
        Ok(issue)
    }

    async fn get_readme(&self, _owner: &str, _repo: &str) -> AppResult<Option<String>> {
        Ok(Some("# Readme".to_string()))
    }
}

/// Text generator answering every prompt with the same reply.
///
/// `reply: None` simulates an upstream failure.
pub struct FakeGenerator {
    pub configured: bool,
    pub reply: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            configured: true,
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            configured: true,
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.configured {
            return Err(AppError::configuration(
                "openai.api_key",
                "OpenAI API key not configured",
            ));
        }
        self.reply
            .clone()
            .ok_or_else(|| AppError::external("openai", "HTTP 500", None))
    }
}
