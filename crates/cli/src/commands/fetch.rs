//! Fetch command - print one normalized feed page

use anyhow::{Context, Result};
use feed_proxy_domain::{DEFAULT_PAGE_LIMIT, FeedRequest};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::FetchArgs;
use crate::commands::serve::build_feed_usecase;
use crate::config::AppConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchOutput<'a> {
    next_page_token: Option<&'a str>,
    data: &'a [feed_proxy_domain::NormalizedPost],
}

pub async fn execute(args: FetchArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let feed = build_feed_usecase(&config)?;

    let request = FeedRequest {
        after: args.after.filter(|a| !a.is_empty()),
        limit: args.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    };

    let page = feed.fetch(&request).await.context("Failed to fetch feed")?;

    tracing::info!(
        posts = page.posts.len(),
        next = ?page.next_page_token,
        "Fetched feed page"
    );

    let output = FetchOutput {
        next_page_token: page.next_page_token.as_deref(),
        data: &page.posts,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
