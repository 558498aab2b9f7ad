//! Command-line entry point: argument parsing, configuration loading and
//! command dispatch.

pub mod parser;
pub mod validation;

pub use parser::{Cli, Commands, LogLevel};

use anyhow::Context;

use crate::config::{ConfigLoader, Environment, Settings};
use crate::logger::init_logger;
use crate::server::Server;

/// Load settings for the parsed arguments and apply `serve` overrides.
///
/// `--config` switches to single-file mode; otherwise the layered
/// `config/` directory (or `OPENSAUCE_CONFIG_FILE`/`OPENSAUCE_CONFIG_DIR`) is used.
pub fn load_settings(cli: &Cli) -> anyhow::Result<(Settings, Environment)> {
    let loader = match cli.config {
        Some(ref path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new().context("Invalid configuration source")?,
    };
    let loader = match cli.env {
        Some(env) => loader.with_environment(env),
        None => loader,
    };

    let mut settings = loader.load().context("Failed to load configuration")?;

    if let Commands::Serve { host, port, .. } = cli.resolved_command() {
        if let Some(host) = host {
            settings.server.host = host;
        }
        if let Some(port) = port {
            settings.server.port = port;
        }
    }

    Ok((settings, loader.environment()))
}

/// Run the parsed command to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let (settings, environment) = load_settings(&cli)?;

    let mut logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Invalid logger configuration")?;
    if let Some(level) = cli.log_level() {
        logger_config = logger_config.with_level(level);
    }
    init_logger(logger_config).context("Failed to initialize logger")?;

    match cli.resolved_command() {
        Commands::Serve { dry_run: true, .. } | Commands::CheckConfig => {
            print_summary(&settings, environment);
            Ok(())
        }
        Commands::Serve { .. } => Server::new(settings, environment).run().await,
    }
}

fn print_summary(settings: &Settings, environment: Environment) {
    let configured = |value: &str| if value.is_empty() { "missing" } else { "configured" };

    println!("✓ Configuration is valid ({})", environment);
    println!("✓ Server would bind to: {}", settings.server.address());
    println!(
        "✓ Cache: {} (enabled: {})",
        format!("{:?}", settings.cache.backend).to_lowercase(),
        settings.cache.enabled
    );
    println!("✓ GitHub token: {}", configured(&settings.github.token));
    println!("✓ OpenAI API key: {}", configured(&settings.openai.api_key));
}
