//! AI-assisted issue classification, implementation guides and repository overviews.
//!
//! Classification is cheap to redo per batch and is never cached. Guides and
//! overviews are memoized; a failed overview degrades to a fallback built
//! from the submitted data.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::Timestamp;

use crate::cache::{CacheManager, IMPLEMENTATION_GUIDE_TTL};
use crate::cache_key;
use crate::error::{AppError, AppResult};
use crate::external::ai::{IssueAnalysis, TextGenerator, parse_classifications};
use crate::models::{
    ClassifiedIssue, GuideIssue, ImplementationGuide, IssueInput, RepoContext, RepoData,
    RepoOverview, RepoOverviewResult,
};

const ISSUE_BODY_EXCERPT: usize = 300;
const README_EXCERPT: usize = 2000;

fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[derive(Clone)]
pub struct AiService {
    generator: Arc<dyn TextGenerator>,
    cache: CacheManager,
}

impl AiService {
    pub fn new(generator: Arc<dyn TextGenerator>, cache: CacheManager) -> Self {
        Self { generator, cache }
    }

    /// Attach a difficulty analysis to each issue, in input order.
    ///
    /// Never fails: without credentials, or when generation or parsing
    /// fails, every issue gets a medium fallback analysis.
    pub async fn classify_issues(
        &self,
        context: &RepoContext,
        issues: Vec<IssueInput>,
    ) -> Vec<ClassifiedIssue> {
        if issues.is_empty() {
            return Vec::new();
        }

        if !self.generator.is_configured() {
            tracing::debug!("Text generation not configured, using fallback classification");
            return with_analysis(issues, |_, _| IssueAnalysis::unavailable());
        }

        let prompt = classification_prompt(context, &issues);
        let parsed = match self.generator.generate(&prompt).await {
            Ok(text) => parse_classifications(&text),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(classifications) => {
                let by_number: HashMap<u64, &IssueAnalysis> = classifications
                    .iter()
                    .filter_map(|c| c.number.map(|n| (n, &c.analysis)))
                    .collect();

                with_analysis(issues, |index, issue| {
                    by_number
                        .get(&issue.number)
                        .copied()
                        .or_else(|| classifications.get(index).map(|c| &c.analysis))
                        .cloned()
                        .unwrap_or_else(IssueAnalysis::failed)
                })
            }
            Err(e) => {
                tracing::warn!(
                    repository = %context.name,
                    error = %e,
                    "Issue classification failed, using fallback"
                );
                with_analysis(issues, |_, _| IssueAnalysis::failed())
            }
        }
    }

    /// Step-by-step guide for one issue, cached for two hours.
    pub async fn implementation_guide(
        &self,
        issue: &GuideIssue,
        context: &RepoContext,
        analysis: Option<&IssueAnalysis>,
    ) -> AppResult<ImplementationGuide> {
        let key = cache_key!("implementation", context.name, issue.number);
        self.cache
            .compute_if_absent(&key, Some(IMPLEMENTATION_GUIDE_TTL), || async {
                let prompt = guide_prompt(issue, context, analysis);
                let guide = self.generator.generate(&prompt).await?;
                Ok::<_, AppError>(ImplementationGuide {
                    guide,
                    generated_at: Timestamp::now(),
                })
            })
            .await
    }

    /// Onboarding overview for a repository. Failures yield a fallback
    /// overview with `success = false`, which is not cached.
    pub async fn repo_overview(&self, data: &RepoData) -> RepoOverviewResult {
        let key = cache_key!("api", "repo-overview", data.full_name);
        let generated = self
            .cache
            .compute_if_absent(&key, None, || async {
                let text = self.generator.generate(&overview_prompt(data)).await?;
                serde_json::from_str::<RepoOverview>(text.trim()).map_err(|e| {
                    AppError::external(
                        "openai",
                        format!("overview is not valid JSON: {}", e),
                        Some(e.into()),
                    )
                })
            })
            .await;

        match generated {
            Ok(overview) => RepoOverviewResult {
                success: true,
                overview,
                error: None,
            },
            Err(e) => {
                tracing::warn!(
                    repository = %data.full_name,
                    error = %e,
                    "Repository overview failed, using fallback"
                );
                RepoOverviewResult {
                    success: false,
                    overview: RepoOverview::fallback(data),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

fn with_analysis<F>(issues: Vec<IssueInput>, mut analyse: F) -> Vec<ClassifiedIssue>
where
    F: FnMut(usize, &IssueInput) -> IssueAnalysis,
{
    issues
        .into_iter()
        .enumerate()
        .map(|(index, issue)| {
            let ai_analysis = analyse(index, &issue);
            ClassifiedIssue { issue, ai_analysis }
        })
        .collect()
}

fn classification_prompt(context: &RepoContext, issues: &[IssueInput]) -> String {
    let issues_text = issues
        .iter()
        .map(|issue| {
            format!(
                "#{}: {}\nLabels: {}\nBody: {}",
                issue.number,
                issue.title,
                issue.labels.join(", "),
                excerpt(&issue.body, ISSUE_BODY_EXCERPT)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Classify these GitHub issues of {} ({}) for new contributors.\n\
         Languages: {}\n\n{}\n\n\
         Return a JSON array of {} objects: \
         {{\"number\": int, \"difficulty_score\": 1-3, \"topics\": [string], \"rationale\": string}}.",
        context.name,
        context.description.as_deref().unwrap_or(""),
        context.language_names(),
        issues_text,
        issues.len()
    )
}

fn guide_prompt(issue: &GuideIssue, context: &RepoContext, analysis: Option<&IssueAnalysis>) -> String {
    let labels = issue
        .labels
        .iter()
        .map(|l| l.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let analysis = analysis
        .map(|a| format!("Difficulty: {:?}. Topics: {}.\n", a.difficulty, a.topics.join(", ")))
        .unwrap_or_default();

    format!(
        "Write an implementation guide for issue #{} \"{}\" in {} ({}).\n\
         Labels: {}\n{}\n{}\n\nREADME:\n{}",
        issue.number,
        issue.title,
        context.name,
        context.language_names(),
        labels,
        analysis,
        issue.body.as_deref().unwrap_or("No description provided"),
        excerpt(context.readme.as_deref().unwrap_or(""), README_EXCERPT)
    )
}

fn overview_prompt(data: &RepoData) -> String {
    format!(
        "Summarize the repository {} ({}) for newcomers. \
         Return strict JSON with keys quick_context {{what, who, why}}, \
         project_landscape {{languages, tools}} and onboarding_essentials (markdown).\n\
         Topics: {}\n\nREADME:\n{}",
        data.full_name,
        data.description.as_deref().unwrap_or(""),
        data.topics.join(", "),
        data.readme.as_deref().unwrap_or("No README available")
    )
}
