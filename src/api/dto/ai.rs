//! Request and response bodies for the AI endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::external::ai::IssueAnalysis;
use crate::models::{ClassifiedIssue, GuideIssue, IssueInput, RepoContext, RepoData};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyIssuesRequest {
    #[validate(nested)]
    pub repo_context: RepoContext,
    #[validate(length(max = 50, message = "at most 50 issues per request"), nested)]
    pub issues: Vec<IssueInput>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyIssuesResponse {
    pub success: bool,
    pub issues: Vec<ClassifiedIssue>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationGuideRequest {
    #[validate(nested)]
    pub issue: GuideIssue,
    #[validate(nested)]
    pub repo_context: RepoContext,
    #[serde(default)]
    pub ai_analysis: Option<IssueAnalysis>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepoOverviewRequest {
    #[validate(nested)]
    pub repo_data: RepoData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_request_shape() {
        let request: ClassifyIssuesRequest = serde_json::from_value(serde_json::json!({
            "repoContext": {"name": "a/b", "languages": {"Rust": 100}},
            "issues": [{"number": 1, "title": "Fix", "labels": ["bug"], "body": "..."}]
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.repo_context.language_names(), "Rust");
    }

    #[test]
    fn test_nested_validation() {
        let request: ClassifyIssuesRequest = serde_json::from_value(serde_json::json!({
            "repoContext": {"name": ""},
            "issues": [{"number": 0, "title": "Fix"}]
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }
}
