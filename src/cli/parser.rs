//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Environment;

/// Cached GitHub discovery API with AI issue analysis
#[derive(Parser, Debug)]
#[command(name = "opensauce")]
#[command(version)]
#[command(about = "Cached GitHub discovery API with AI issue analysis")]
#[command(long_about = "
Opensauce serves repository, search and issue data from GitHub together with
AI-assisted issue classification. Upstream results are memoized in an in-memory
or Redis cache.

EXAMPLES:
    # Start the server with default configuration
    opensauce

    # Start server on custom host and port
    opensauce serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    opensauce --config /etc/opensauce/production.toml serve

    # Validate configuration without starting the server
    opensauce check-config
")]
pub struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads this TOML file instead of the layered `config/` directory.
    /// `OPENSAUCE_*` environment variables still apply on top of it.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (`OPENSAUCE_APP_ENV`)
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, value_name = "ENV")]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// The cache backend is not contacted until the first request needs it,
    /// so the server starts even when Redis is unreachable.
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and validate the configuration, then print a summary
    CheckConfig,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// The command to run, `serve` with no overrides when none was given.
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
            log_level: None,
            dry_run: false,
        })
    }

    /// Log level implied by the flags, if any.
    ///
    /// `serve --log-level` takes precedence over `--verbose` and `--quiet`.
    pub fn log_level(&self) -> Option<&'static str> {
        if let Some(Commands::Serve {
            log_level: Some(level),
            ..
        }) = &self.command
        {
            return Some(level.as_str());
        }
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["opensauce", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["opensauce"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.env.is_none());
        assert_eq!(
            cli.resolved_command(),
            Commands::Serve {
                host: None,
                port: None,
                log_level: None,
                dry_run: false,
            }
        );
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "opensauce", "serve", "--host", "0.0.0.0", "--port", "8080", "--dry-run",
        ])
        .unwrap();

        match cli.resolved_command() {
            Commands::Serve {
                host,
                port,
                dry_run,
                ..
            } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert!(dry_run);
            }
            other => panic!("Expected Serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_check_config_command() {
        let cli = Cli::try_parse_from(["opensauce", "--env", "prod", "check-config"]).unwrap();
        assert_eq!(cli.resolved_command(), Commands::CheckConfig);
        assert_eq!(cli.env, Some(Environment::Production));
    }

    #[test]
    fn test_invalid_environment_rejected() {
        assert!(Cli::try_parse_from(["opensauce", "--env", "staging"]).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["opensauce", "serve", "--port", "0"]).is_err());
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::try_parse_from(["opensauce", "--verbose"]).unwrap();
        assert_eq!(cli.log_level(), Some("debug"));

        let cli = Cli::try_parse_from(["opensauce", "--quiet"]).unwrap();
        assert_eq!(cli.log_level(), Some("error"));

        let cli =
            Cli::try_parse_from(["opensauce", "--quiet", "serve", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.log_level(), Some("trace"));
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["opensauce", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
