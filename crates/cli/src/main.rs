//! feed-proxy CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Variables from .env are visible to config loading and secret lookups
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; commands report their own config errors
    let file_config = crate::config::AppConfig::load(cli.config.as_deref()).ok();
    let log_level = resolve_log_level(cli.log_level.as_deref(), file_config.as_ref());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    init_logging(&log_level, json_logs)?;

    // Execute command
    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.config).await,
        Commands::Fetch(args) => commands::fetch::execute(args, cli.config).await,
        Commands::Classify(args) => commands::classify::execute(args).await,
        Commands::Config(args) => commands::config::execute(args, cli.config).await,
        Commands::Doctor(args) => commands::doctor::execute(args, cli.config).await,
    }
}

/// `--log-level` wins over `[general] log_level`
fn resolve_log_level(flag: Option<&str>, config: Option<&crate::config::AppConfig>) -> String {
    flag.map(str::to_string)
        .or_else(|| config.map(|c| c.general.log_level.clone()))
        .unwrap_or_else(|| "info".to_string())
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, GeneralConfig};

    fn with_level(level: &str) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                log_level: level.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_flag_overrides_config_level() {
        assert_eq!(
            resolve_log_level(Some("trace"), Some(&with_level("warn"))),
            "trace"
        );
    }

    #[test]
    fn test_config_level_used_without_flag() {
        assert_eq!(resolve_log_level(None, Some(&with_level("debug"))), "debug");
        assert_eq!(resolve_log_level(None, None), "info");
    }
}
