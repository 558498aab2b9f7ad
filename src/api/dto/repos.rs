//! Query parameters for repository and issue endpoints.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueListParams {
    pub state: Option<String>,
    /// Comma-separated label names, passed through to GitHub.
    pub labels: Option<String>,
}
