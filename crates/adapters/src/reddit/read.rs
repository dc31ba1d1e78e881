//! Reddit listing adapter for fetching feed pages

use async_trait::async_trait;
use feed_proxy_domain::{FeedRequest, FeedSource, FeedSourceError, Listing, RawPost};
use reqwest::{Client, Url, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// Desktop browser user agent sent alongside a session cookie
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Options for talking to the upstream listing endpoint
#[derive(Debug, Clone)]
pub struct UpstreamOptions {
    /// Session cookie for feeds that need a logged-in user
    pub cookie: Option<SecretString>,
    /// User agent sent together with the cookie
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for UpstreamOptions {
    fn default() -> Self {
        Self {
            cookie: None,
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Feed source reading a Reddit-style JSON listing
pub struct RedditFeedSource {
    client: Client,
    feed_url: Url,
    cookie: Option<SecretString>,
    user_agent: String,
}

impl RedditFeedSource {
    pub fn new(feed_url: &str, options: UpstreamOptions) -> Result<Self, FeedSourceError> {
        let feed_url =
            Url::parse(feed_url).map_err(|e| FeedSourceError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| FeedSourceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            feed_url,
            cookie: options.cookie,
            user_agent: options.user_agent,
        })
    }

    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    /// Feed URL with the paging parameters appended to any existing query
    fn page_url(&self, request: &FeedRequest) -> Url {
        let mut url = self.feed_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &request.limit.to_string());
            if let Some(after) = &request.after {
                query.append_pair("after", after);
            }
        }
        url
    }
}

#[derive(Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Deserialize)]
struct Child {
    #[serde(default)]
    data: RawPost,
}

#[async_trait]
impl FeedSource for RedditFeedSource {
    async fn fetch_page(&self, request: &FeedRequest) -> Result<Listing, FeedSourceError> {
        let url = self.page_url(request);

        tracing::info!(
            limit = request.limit,
            after = ?request.after,
            with_cookie = self.cookie.is_some(),
            "Fetching feed page"
        );

        let mut builder = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            builder = builder
                .header(header::COOKIE, cookie.expose_secret())
                .header(header::USER_AGENT, &self.user_agent);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "Feed request failed");
            FeedSourceError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Feed request failed");
            return Err(FeedSourceError::Status(status.as_u16()));
        }

        let envelope: ListingEnvelope = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Feed response could not be decoded");
            FeedSourceError::Decode(e.to_string())
        })?;

        let posts: Vec<RawPost> = envelope
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect();

        tracing::info!(count = posts.len(), after = ?envelope.data.after, "Fetched feed page");

        Ok(Listing {
            posts,
            after: envelope.data.after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing_body() -> serde_json::Value {
        serde_json::json!({
            "kind": "Listing",
            "data": {
                "after": "t3_next",
                "children": [
                    {"kind": "t3", "data": {"id": "first", "url": "https://i.redd.it/a.jpg"}},
                    {"kind": "t3", "data": {"id": "second", "is_gallery": "maybe"}}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/pics/hot.json"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = RedditFeedSource::new(
            &format!("{}/r/pics/hot.json", mock_server.uri()),
            UpstreamOptions::default(),
        )
        .unwrap();

        let listing = source.fetch_page(&FeedRequest::default()).await.unwrap();

        assert_eq!(listing.posts.len(), 2);
        assert_eq!(listing.posts[0].id.as_deref(), Some("first"));
        assert!(!listing.posts[1].is_gallery());
        assert_eq!(listing.after.as_deref(), Some("t3_next"));
    }

    #[tokio::test]
    async fn test_fetch_page_forwards_paging_parameters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed.json"))
            .and(query_param("feed", "secret-feed-id"))
            .and(query_param("limit", "5"))
            .and(query_param("after", "t3_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = RedditFeedSource::new(
            &format!("{}/feed.json?feed=secret-feed-id", mock_server.uri()),
            UpstreamOptions::default(),
        )
        .unwrap();

        let request = FeedRequest {
            after: Some("t3_abc".to_string()),
            limit: 5,
        };
        source.fetch_page(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_page_sends_cookie_and_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("cookie", "reddit_session=abc"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let options = UpstreamOptions {
            cookie: Some(SecretString::new("reddit_session=abc".into())),
            ..Default::default()
        };
        let source =
            RedditFeedSource::new(&format!("{}/hot.json", mock_server.uri()), options).unwrap();

        assert!(source.fetch_page(&FeedRequest::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_page_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let source =
            RedditFeedSource::new(&format!("{}/hot.json", mock_server.uri()), Default::default())
                .unwrap();

        let result = source.fetch_page(&FeedRequest::default()).await;

        assert!(matches!(result, Err(FeedSourceError::Status(403))));
    }

    #[tokio::test]
    async fn test_fetch_page_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&mock_server)
            .await;

        let source =
            RedditFeedSource::new(&format!("{}/hot.json", mock_server.uri()), Default::default())
                .unwrap();

        let result = source.fetch_page(&FeedRequest::default()).await;

        assert!(matches!(result, Err(FeedSourceError::Decode(_))));
    }

    #[test]
    fn test_invalid_feed_url() {
        let result = RedditFeedSource::new("not a url", UpstreamOptions::default());
        assert!(matches!(result, Err(FeedSourceError::InvalidUrl(_))));
    }
}
