//! Service layer for business logic operations.
//!
//! Services coordinate between the upstream providers and the cache; every
//! memoized upstream call goes through [`CacheManager::compute_if_absent`].

mod ai_service;
mod repo_service;
#[cfg(test)]
pub(crate) mod testing;

pub use ai_service::AiService;
pub use repo_service::RepoService;

use std::sync::Arc;

use crate::cache::CacheManager;
use crate::external::ai::TextGenerator;
use crate::external::github::RepositoryProvider;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since providers and the cache are shared via `Arc`.
#[derive(Clone)]
pub struct Services {
    pub repos: RepoService,
    pub ai: AiService,
}

impl Services {
    pub fn new(
        provider: Arc<dyn RepositoryProvider>,
        generator: Arc<dyn TextGenerator>,
        cache: CacheManager,
    ) -> Self {
        Self {
            repos: RepoService::new(provider, cache.clone()),
            ai: AiService::new(generator, cache),
        }
    }
}
