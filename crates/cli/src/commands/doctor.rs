//! Doctor command - validate configuration and show status

use anyhow::Result;
use feed_proxy_adapters::reddit::{RedditFeedSource, UpstreamOptions};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::{AppConfig, non_empty_env};

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    upstream: CheckResult,
    auth: CheckResult,
    frontend: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        upstream: CheckResult::error("Not checked"),
        auth: CheckResult::error("Not checked"),
        frontend: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.upstream = check_upstream(config);
        report.auth = check_auth(config);
        report.frontend = check_frontend(config);
    }

    let checks = [
        &report.config,
        &report.upstream,
        &report.auth,
        &report.frontend,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

/// A missing feed URL is only a warning: the server starts and answers
/// feed requests with a configuration error.
fn check_upstream(config: &AppConfig) -> CheckResult {
    let upstream = &config.upstream;

    let Some(url) = upstream.resolve_feed_url() else {
        return CheckResult::warn(format!(
            "No feed URL configured (set upstream.feed_url or {})",
            upstream.feed_url_env
        ));
    };

    if let Err(e) = RedditFeedSource::new(&url, UpstreamOptions::default()) {
        return CheckResult::error(format!("{}", e));
    }

    let has_cookie = non_empty_env(&upstream.cookie_env).is_some();
    CheckResult::ok(format!("Feed URL: {}", url)).with_details(serde_json::json!({
        "cookie": has_cookie,
        "timeout_secs": upstream.timeout_secs,
    }))
}

fn check_auth(config: &AppConfig) -> CheckResult {
    let auth = &config.auth;

    let missing: Vec<&str> = [
        auth.password_env.as_str(),
        auth.access_secret_env.as_str(),
        auth.refresh_secret_env.as_str(),
    ]
    .into_iter()
    .filter(|name| non_empty_env(name).is_none())
    .collect();

    if !missing.is_empty() {
        return CheckResult::error(format!(
            "Missing environment variables: {}",
            missing.join(", ")
        ));
    }

    if auth.access_secret_env == auth.refresh_secret_env {
        return CheckResult::warn("Access and refresh tokens share one signing secret");
    }

    let mut result = CheckResult::ok(format!("User '{}' can log in", auth.username));
    if !auth.cookie_secure {
        result = CheckResult::warn("Refresh cookie is sent without the Secure attribute");
    }
    result.with_details(serde_json::json!({
        "access_ttl_secs": auth.access_ttl_secs,
        "refresh_ttl_secs": auth.refresh_ttl_secs,
    }))
}

fn check_frontend(config: &AppConfig) -> CheckResult {
    match &config.server.static_dir {
        None => CheckResult::ok("Static file serving disabled"),
        Some(dir) if dir.is_dir() => CheckResult::ok(format!("Serving {}", dir.display())),
        Some(dir) => CheckResult::warn(format!(
            "Static directory does not exist: {}",
            dir.display()
        )),
    }
}

fn print_report(report: &DoctorReport) {
    println!("feed-proxy Doctor Report");
    println!("========================");
    println!();

    print_check("Config", &report.config);
    print_check("Upstream", &report.upstream);
    print_check("Auth", &report.auth);
    print_check("Frontend", &report.frontend);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to serve! Try: feed-proxy serve");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
