//! Configuration management module for opensauce
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. Built-in defaults
//! 2. `default.toml` - Base configuration
//! 3. `{environment}.toml` - Environment-specific configuration
//! 4. `local.toml` - Local development overrides (not committed to version control)
//! 5. `OPENSAUCE_*` environment variables
//!
//! `REDIS_URL`, `GITHUB_TOKEN` and `OPENAI_API_KEY` fill settings left empty.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

// Re-export public types
pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{CacheConfig, GitHubConfig, OpenAiConfig, Settings};
