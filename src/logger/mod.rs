//! Logger Module
//!
//! Console logging based on `tracing-subscriber` with:
//! - `EnvFilter` level directives
//! - Full, compact, or JSON formatting
//! - ANSI colors only when attached to a terminal

pub mod config;
pub mod error;


pub use config::{LogFormat, LoggerConfig};
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber for the given configuration.
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    let filter = config.filter()?;
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(use_ansi).with_target(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_ansi(use_ansi).with_target(true).compact())
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json())
            .try_init(),
    };

    result.map_err(|e| LoggerError::init(e.to_string()))
}
