//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::cache::CacheManager;
use crate::config::Settings;
use crate::error::AppResult;
use crate::external::ai::OpenAiClient;
use crate::external::github::GitHubClient;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since services and the cache share their backends via `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the cache for health reporting and invalidation
    pub cache: CacheManager,
}

impl AppState {
    pub fn new(services: Services, cache: CacheManager) -> Self {
        Self { services, cache }
    }

    /// Wires the upstream clients and the cache from configuration.
    ///
    /// Performs no network I/O; the cache backend connects on first use.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let cache = CacheManager::new(&settings.cache);
        let github = Arc::new(GitHubClient::new(&settings.github)?);
        let openai = Arc::new(OpenAiClient::new(&settings.openai, &settings.github.user_agent)?);

        let services = Services::new(github, openai, cache.clone());
        Ok(Self::new(services, cache))
    }
}
