//! Reddit listing adapters

mod read;

pub use read::{BROWSER_USER_AGENT, RedditFeedSource, UpstreamOptions};

use async_trait::async_trait;
use feed_proxy_domain::{FeedRequest, FeedSource, FeedSourceError, Listing, RawPost};
use std::sync::Mutex;

/// Stub feed source for testing and offline runs
pub struct StubFeedSource {
    posts: Vec<RawPost>,
    after: Option<String>,
    failure: Option<u16>,
    requests: Mutex<Vec<FeedRequest>>,
}

impl StubFeedSource {
    /// Create an empty stub
    pub fn empty() -> Self {
        Self::with_posts(vec![], None)
    }

    /// Create a stub returning the given page
    pub fn with_posts(posts: Vec<RawPost>, after: Option<String>) -> Self {
        Self {
            posts,
            after,
            failure: None,
            requests: Mutex::new(vec![]),
        }
    }

    /// Create a stub that answers every request with an upstream status error
    pub fn failing(status: u16) -> Self {
        Self {
            failure: Some(status),
            ..Self::empty()
        }
    }

    /// Get all requests received so far
    pub fn requests(&self) -> Vec<FeedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeedSource for StubFeedSource {
    async fn fetch_page(&self, request: &FeedRequest) -> Result<Listing, FeedSourceError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(status) = self.failure {
            return Err(FeedSourceError::Status(status));
        }

        Ok(Listing {
            posts: self.posts.clone(),
            after: self.after.clone(),
        })
    }
}
