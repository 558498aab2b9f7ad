use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::external::ai::IssueAnalysis;
use crate::external::github::Label;

/// What the model is told about the repository an issue belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RepoContext {
    /// `owner/repo`
    #[validate(length(min = 1, max = 200, message = "repository name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Language name to byte count, as GitHub reports it. Only the keys are used.
    #[serde(default)]
    pub languages: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub readme: Option<String>,
}

impl RepoContext {
    pub fn language_names(&self) -> String {
        self.languages.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IssueInput {
    #[validate(range(min = 1, message = "issue number must be positive"))]
    pub number: u64,
    #[validate(length(min = 1, message = "issue title is required"))]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIssue {
    #[serde(flatten)]
    pub issue: IssueInput,
    pub ai_analysis: IssueAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GuideIssue {
    #[validate(range(min = 1, message = "issue number must be positive"))]
    pub number: u64,
    #[validate(length(min = 1, message = "issue title is required"))]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationGuide {
    pub guide: String,
    pub generated_at: Timestamp,
}

/// Repository snapshot submitted for an onboarding overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RepoData {
    #[validate(length(min = 1, max = 200, message = "full_name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub languages: BTreeMap<String, serde_json::Value>,
    #[serde(default, alias = "fileExtensions")]
    pub file_extensions: Vec<String>,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default, alias = "packageFiles")]
    pub package_files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickContext {
    #[serde(default)]
    pub what: String,
    #[serde(default)]
    pub who: String,
    #[serde(default)]
    pub why: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLandscape {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoOverview {
    #[serde(default)]
    pub quick_context: QuickContext,
    #[serde(default)]
    pub project_landscape: ProjectLandscape,
    #[serde(default)]
    pub onboarding_essentials: String,
}

const FALLBACK_ONBOARDING: &str = "## Getting Started

Please check the repository README for setup instructions.

### Prerequisites
- Git
- Basic programming knowledge

### Setup
1. Clone the repository
2. Follow the README instructions";

impl RepoOverview {
    /// Overview built from the submitted data alone, without generation.
    pub fn fallback(data: &RepoData) -> Self {
        let languages = if data.languages.is_empty() {
            data.language.iter().cloned().collect()
        } else {
            data.languages.keys().cloned().collect()
        };

        Self {
            quick_context: QuickContext {
                what: data
                    .description
                    .clone()
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "Repository analysis failed".to_string()),
                ..QuickContext::default()
            },
            project_landscape: ProjectLandscape {
                languages,
                ..ProjectLandscape::default()
            },
            onboarding_essentials: FALLBACK_ONBOARDING.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoOverviewResult {
    pub success: bool,
    pub overview: RepoOverview,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
