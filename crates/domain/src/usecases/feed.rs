//! Feed page use case - fetch one upstream page and normalize it

use std::sync::Arc;
use thiserror::Error;

use crate::{
    model::{FeedPage, FeedRequest},
    ports::{FeedSource, FeedSourceError},
    usecases::normalize::normalize_post,
};

/// Errors surfaced by the feed use case
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Missing upstream feed URL")]
    NotConfigured,
    #[error(transparent)]
    Source(#[from] FeedSourceError),
}

/// Fetches a page from the configured source and normalizes every post
#[derive(Clone)]
pub struct FeedUseCase {
    source: Option<Arc<dyn FeedSource>>,
}

impl FeedUseCase {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Use case without an upstream; every fetch reports a configuration error
    pub fn unconfigured() -> Self {
        Self { source: None }
    }

    pub async fn fetch(&self, request: &FeedRequest) -> Result<FeedPage, FeedError> {
        let source = self.source.as_ref().ok_or(FeedError::NotConfigured)?;

        let listing = source.fetch_page(request).await?;
        let posts: Vec<_> = listing.posts.iter().map(normalize_post).collect();

        tracing::debug!(
            count = posts.len(),
            after = ?request.after,
            next = ?listing.after,
            "Normalized feed page"
        );

        Ok(FeedPage {
            posts,
            next_page_token: listing.after,
        })
    }
}
