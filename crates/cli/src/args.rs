//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// feed-proxy: authenticated proxy serving a normalized social-media feed
#[derive(Parser, Debug)]
#[command(name = "feed-proxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Fetch one normalized feed page and print it as JSON
    Fetch(FetchArgs),

    /// Classify the media of a single raw post
    Classify(ClassifyArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the listen host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Pagination cursor from a previous page
    #[arg(long)]
    pub after: Option<String>,

    /// Number of posts to request
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File containing one raw post as JSON (use - or omit for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Print the full normalized post instead of only the media descriptor
    #[arg(long)]
    pub normalized: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration after environment overrides
    Show,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
