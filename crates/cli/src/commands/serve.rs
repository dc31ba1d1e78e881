//! Serve command - run the HTTP server

use anyhow::{Context, Result, bail};
use feed_proxy_adapters::{
    auth::{JwtTokenService, StaticCredentialStore, TokenTtl},
    http::{AppState, RefreshCookie, RouterOptions, create_router},
    reddit::{RedditFeedSource, UpstreamOptions},
};
use feed_proxy_domain::{
    SystemClock,
    usecases::{FeedUseCase, SessionUseCase},
};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::args::ServeArgs;
use crate::config::{AppConfig, non_empty_env};

pub async fn execute(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let feed = build_feed_usecase(&config)?;
    let session = build_session_usecase(&config)?;

    let state = AppState {
        feed,
        session,
        cookie: RefreshCookie {
            name: config.auth.cookie_name.clone(),
            secure: config.auth.cookie_secure,
            max_age: time::Duration::seconds(secs_i64(config.auth.refresh_ttl_secs)),
        },
    };

    let static_dir = config.server.static_dir.clone().filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            tracing::warn!(dir = %dir.display(), "Static directory not found, frontend disabled");
        }
        exists
    });

    let options = RouterOptions {
        cors_origins: config.server.cors_origins.clone(),
        static_dir,
    };
    let app = create_router(state, &options);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, "feed-proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("feed-proxy stopped");
    Ok(())
}

/// Build the feed use case; a missing feed URL yields an unconfigured one
pub(crate) fn build_feed_usecase(config: &AppConfig) -> Result<FeedUseCase> {
    let Some(feed_url) = config.upstream.resolve_feed_url() else {
        tracing::warn!(
            env = %config.upstream.feed_url_env,
            "No upstream feed URL configured; /api/feed will fail"
        );
        return Ok(FeedUseCase::unconfigured());
    };

    let options = UpstreamOptions {
        cookie: non_empty_env(&config.upstream.cookie_env).map(|c| SecretString::new(c.into())),
        user_agent: config.upstream.user_agent.clone(),
        timeout: Duration::from_secs(config.upstream.timeout_secs),
    };

    let source = RedditFeedSource::new(&feed_url, options)
        .with_context(|| format!("Invalid upstream feed URL: {}", feed_url))?;

    tracing::info!(url = %source.feed_url(), "Upstream feed configured");
    Ok(FeedUseCase::new(Arc::new(source)))
}

/// Build the session use case from the configured user and signing secrets
pub(crate) fn build_session_usecase(config: &AppConfig) -> Result<SessionUseCase> {
    let auth = &config.auth;

    let password = load_secret(&auth.password_env, "login password")?;
    let access_secret = load_secret(&auth.access_secret_env, "access token secret")?;
    let refresh_secret = load_secret(&auth.refresh_secret_env, "refresh token secret")?;

    let ttl = TokenTtl {
        access: time::Duration::seconds(secs_i64(auth.access_ttl_secs)),
        refresh: time::Duration::seconds(secs_i64(auth.refresh_ttl_secs)),
    };

    let tokens = JwtTokenService::new(&access_secret, &refresh_secret, ttl, Arc::new(SystemClock));
    let credentials = StaticCredentialStore::new(auth.username.clone(), &password);

    Ok(SessionUseCase::new(Arc::new(credentials), Arc::new(tokens)))
}

pub(crate) fn load_secret(env_var: &str, label: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No environment variable configured for the {}", label);
    }

    let value = std::env::var(env_var)
        .with_context(|| format!("Missing {} in environment variable {}", label, env_var))?;

    if value.trim().is_empty() {
        bail!("Environment variable {} for the {} is empty", env_var, label);
    }

    Ok(SecretString::new(value.into()))
}

fn secs_i64(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
