//! Configuration loading and management

use anyhow::{Context, Result};
use feed_proxy_adapters::reddit::BROWSER_USER_AGENT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_static_dir")]
    pub static_dir: Option<PathBuf>,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Listing URL; falls back to the variable named by `feed_url_env`
    #[serde(default)]
    pub feed_url: Option<String>,

    #[serde(default = "default_feed_url_env")]
    pub feed_url_env: String,

    #[serde(default = "default_cookie_env")]
    pub cookie_env: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password_env")]
    pub password_env: String,

    #[serde(default = "default_access_secret_env")]
    pub access_secret_env: String,

    #[serde(default = "default_refresh_secret_env")]
    pub refresh_secret_env: String,

    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: u64,

    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: u64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_true")]
    pub cookie_secure: bool,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> Option<PathBuf> {
    Some(PathBuf::from("./public"))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_feed_url_env() -> String {
    "REDDIT_FEED_URL".to_string()
}

fn default_cookie_env() -> String {
    "REDDIT_COOKIE".to_string()
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password_env() -> String {
    "FEED_PROXY_PASSWORD".to_string()
}

fn default_access_secret_env() -> String {
    "ACCESS_TOKEN_SECRET".to_string()
}

fn default_refresh_secret_env() -> String {
    "REFRESH_TOKEN_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15 * 60
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_cookie_name() -> String {
    "refreshToken".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            feed_url_env: default_feed_url_env(),
            cookie_env: default_cookie_env(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password_env: default_password_env(),
            access_secret_env: default_access_secret_env(),
            refresh_secret_env: default_refresh_secret_env(),
            access_ttl_secs: default_access_ttl(),
            refresh_ttl_secs: default_refresh_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: default_true(),
        }
    }
}

impl UpstreamConfig {
    /// Feed URL from the config file, or from the configured env var
    pub fn resolve_feed_url(&self) -> Option<String> {
        self.feed_url
            .clone()
            .or_else(|| non_empty_env(&self.feed_url_env))
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }
}

/// Read an environment variable, treating empty values as unset
pub fn non_empty_env(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("FEED_PROXY")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        format!(
            r#"# feed-proxy configuration

[general]
log_level = "info"

[server]
host = "0.0.0.0"
port = 3000
# Frontend files served for every non-API path
static_dir = "./public"
cors_origins = ["*"]

[upstream]
# feed_url = "https://www.reddit.com/r/pics/hot.json"
# Used when feed_url is not set
feed_url_env = "REDDIT_FEED_URL"
# Session cookie for feeds that need a logged-in user
cookie_env = "REDDIT_COOKIE"
user_agent = "{user_agent}"
timeout_secs = 30

[auth]
username = "admin"
password_env = "FEED_PROXY_PASSWORD"
access_secret_env = "ACCESS_TOKEN_SECRET"
refresh_secret_env = "REFRESH_TOKEN_SECRET"
access_ttl_secs = 900
refresh_ttl_secs = 604800
cookie_name = "refreshToken"
cookie_secure = true
"#,
            user_agent = BROWSER_USER_AGENT
        )
    }
}
