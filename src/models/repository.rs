use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::external::github::Repository;

/// Repository metadata as served to clients and cached under `repo:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub language: String,
    pub topics: Vec<String>,
    pub html_url: String,
    pub updated_at: Option<Timestamp>,
    pub readme: Option<String>,
}

impl RepositorySummary {
    pub fn from_repository(repo: Repository, readme: Option<String>) -> Self {
        Self {
            name: repo.name,
            full_name: repo.full_name,
            owner: repo.owner.login,
            description: repo
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No description available".to_string()),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            language: repo.language.unwrap_or_else(|| "Unknown".to_string()),
            topics: repo.topics,
            html_url: repo.html_url,
            updated_at: repo.updated_at,
            readme,
        }
    }
}
