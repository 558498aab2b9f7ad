//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `ai` - Classification, guide and overview bodies
//! - `repos` - Search and issue listing query parameters
//! - `health` - Health check response
//! - `error` - Common error response DTOs

mod ai;
mod error;
mod health;
mod repos;

pub use ai::{
    ClassifyIssuesRequest, ClassifyIssuesResponse, ImplementationGuideRequest, RepoOverviewRequest,
};
pub use error::ErrorResponse;
pub use health::{CacheHealth, HealthResponse, HealthStatus};
pub use repos::{IssueListParams, SearchParams};
