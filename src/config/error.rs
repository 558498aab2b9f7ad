//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Why settings could not be produced
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required configuration file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Two configuration sources that cannot be combined were both selected
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error("Unknown environment '{0}'. Valid values are: development, test, production")]
    UnknownEnvironment(String),

    /// A setting is present but out of range or malformed
    #[error("Invalid value for {field}: {message}")]
    Invalid { field: String, message: String },

    /// The merged sources do not fit the settings structure
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(#[source] config::ConfigError),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted path of the offending setting, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
