mod ai;
mod repository;

pub use ai::{
    ClassifiedIssue, GuideIssue, ImplementationGuide, IssueInput, ProjectLandscape, QuickContext,
    RepoContext, RepoData, RepoOverview, RepoOverviewResult,
};
pub use repository::RepositorySummary;
