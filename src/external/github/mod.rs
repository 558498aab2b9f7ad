mod client;
mod provider;
mod types;

pub use client::GitHubClient;
pub use provider::RepositoryProvider;
pub use types::{Issue, Label, Owner, Repository, SearchResults};
