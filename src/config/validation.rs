//! Configuration validation logic
//!
//! Range and format checks run after all sources are merged.

use crate::config::error::ConfigError;
use crate::config::settings::{
    CacheBackend, CacheConfig, GitHubConfig, LoggerSettings, OpenAiConfig, ServerConfig, Settings,
};

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host address cannot be empty.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.format".to_string(),
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if tracing_subscriber::EnvFilter::try_new(&self.level).is_err() {
            return Err(ConfigError::validation(
                "logger.level".to_string(),
                format!("Invalid log level or filter directive '{}'", self.level),
            ));
        }

        Ok(())
    }
}

impl CacheConfig {
    /// Validate cache configuration
    ///
    /// The Redis URL is deliberately not checked: an unusable address must
    /// degrade to cache misses at runtime, never block startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.max_size == 0 {
            return Err(ConfigError::validation(
                "cache.memory.max_size",
                "Memory cache size must be greater than 0.",
            ));
        }

        if self.redis.pool_size == 0 {
            return Err(ConfigError::validation(
                "cache.redis.pool_size",
                "Redis pool size must be greater than 0.",
            ));
        }

        if self.redis.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "cache.redis.connection_timeout",
                "Redis connection timeout must be greater than 0 seconds.",
            ));
        }

        if self.enabled && self.backend == CacheBackend::Redis && self.redis.url.is_empty() {
            tracing::warn!("Redis cache selected but no URL configured, cache will always miss");
        }

        Ok(())
    }
}

impl GitHubConfig {
    /// Validate GitHub API configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_url) {
            return Err(ConfigError::validation(
                "github.api_url".to_string(),
                format!("Expected an http(s) URL, got '{}'", self.api_url),
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "github.timeout",
                "GitHub request timeout must be greater than 0 seconds.",
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::validation(
                "github.user_agent",
                "GitHub requires a non-empty User-Agent header.",
            ));
        }

        Ok(())
    }
}

impl OpenAiConfig {
    /// Validate text generation configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.api_url) {
            return Err(ConfigError::validation(
                "openai.api_url".to_string(),
                format!("Expected an http(s) URL, got '{}'", self.api_url),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::validation(
                "openai.model",
                "Model name cannot be empty.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "openai.timeout",
                "Text generation timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.cache.validate()?;
        self.github.validate()?;
        self.openai.validate()?;
        Ok(())
    }
}
