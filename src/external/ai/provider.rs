use async_trait::async_trait;

use crate::error::AppResult;

/// Turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether credentials are configured; callers use this to skip
    /// generation entirely and return their fallback.
    fn is_configured(&self) -> bool;

    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
