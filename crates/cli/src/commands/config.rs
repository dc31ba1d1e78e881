//! Config command - configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::{AppConfig, non_empty_env};

pub async fn execute(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => init_config(path, force),
        ConfigCommands::Show => show_config(config_path),
    }
}

fn init_config(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(&path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set upstream.feed_url, or export REDDIT_FEED_URL");
    println!("  2. Export FEED_PROXY_PASSWORD, ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET");
    println!("  3. Run 'feed-proxy doctor' to validate your setup");
    println!("  4. Run 'feed-proxy serve' to start the server");

    Ok(())
}

/// Secrets are only named in the config, so this never prints a secret value.
fn show_config(config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let rendered =
        toml::to_string_pretty(&config).context("Failed to render configuration as TOML")?;
    println!("{}", rendered.trim_end());

    let upstream = &config.upstream;
    let auth = &config.auth;
    println!();
    println!("# Resolved from the environment");
    println!(
        "# feed url: {}",
        upstream
            .resolve_feed_url()
            .unwrap_or_else(|| "(not set)".to_string())
    );
    for name in [
        upstream.cookie_env.as_str(),
        auth.password_env.as_str(),
        auth.access_secret_env.as_str(),
        auth.refresh_secret_env.as_str(),
    ] {
        let state = if non_empty_env(name).is_some() {
            "set"
        } else {
            "missing"
        };
        println!("# {}: {}", name, state);
    }

    Ok(())
}
