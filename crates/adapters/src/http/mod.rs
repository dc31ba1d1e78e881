//! HTTP API adapter (axum)

mod error;
mod extract;
mod handlers;

pub use error::{ApiError, ApiResult};
pub use extract::AuthUser;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use feed_proxy_domain::usecases::{FeedUseCase, SessionUseCase};
use std::path::PathBuf;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Attributes of the refresh token cookie
#[derive(Debug, Clone)]
pub struct RefreshCookie {
    pub name: String,
    pub secure: bool,
    pub max_age: time::Duration,
}

impl Default for RefreshCookie {
    fn default() -> Self {
        Self {
            name: "refreshToken".to_string(),
            secure: true,
            max_age: time::Duration::days(7),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedUseCase,
    pub session: SessionUseCase,
    pub cookie: RefreshCookie,
}

/// Router-level settings that are not part of request handling
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Allowed CORS origins; `*` allows any origin without credentials
    pub cors_origins: Vec<String>,
    /// Directory served for every path not matched by the API
    pub static_dir: Option<PathBuf>,
}

/// Create the API router.
pub fn create_router(state: AppState, options: &RouterOptions) -> Router {
    let mut router = Router::new()
        .route("/api/feed", get(handlers::get_feed))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
        .route("/health", get(handlers::health))
        .with_state(state);

    if let Some(dir) = &options.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Create CORS layer.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(Duration::from_secs(600));
    }

    // Credentials (the refresh cookie) require explicit origins and headers.
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .allow_origin(origins)
        .max_age(Duration::from_secs(600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtTokenService, StaticCredentialStore, TokenTtl};
    use crate::reddit::StubFeedSource;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use feed_proxy_domain::{Clock, FeedRequest, RawPost, SystemClock, TokenService};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Harness {
        router: Router,
        source: Arc<StubFeedSource>,
        tokens: Arc<JwtTokenService>,
    }

    fn harness_with(source: Option<StubFeedSource>) -> Harness {
        let source = Arc::new(source.unwrap_or_else(StubFeedSource::empty));
        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::new("access-secret".into()),
            &SecretString::new("refresh-secret".into()),
            TokenTtl::default(),
            Arc::new(SystemClock),
        ));
        let credentials = Arc::new(StaticCredentialStore::new(
            "admin",
            &SecretString::new("hunter2".into()),
        ));

        let state = AppState {
            feed: FeedUseCase::new(source.clone()),
            session: SessionUseCase::new(credentials, tokens.clone()),
            cookie: RefreshCookie::default(),
        };

        Harness {
            router: create_router(state, &RouterOptions::default()),
            source,
            tokens,
        }
    }

    fn harness() -> Harness {
        harness_with(None)
    }

    impl Harness {
        fn access_token(&self) -> String {
            self.tokens
                .issue_access(&feed_proxy_domain::Principal {
                    username: "admin".to_string(),
                })
                .unwrap()
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }
    }

    struct FixedClock(time::OffsetDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> time::OffsetDateTime {
            self.0
        }
    }

    /// Refresh token signed with the harness secrets but already past its expiry
    fn expired_refresh_token() -> String {
        let issued_at = time::OffsetDateTime::now_utc() - time::Duration::days(8);
        JwtTokenService::new(
            &SecretString::new("access-secret".into()),
            &SecretString::new("refresh-secret".into()),
            TokenTtl::default(),
            Arc::new(FixedClock(issued_at)),
        )
        .issue(&feed_proxy_domain::Principal {
            username: "admin".to_string(),
        })
        .unwrap()
        .refresh_token
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_feed(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"username": username, "password": password}).to_string(),
            ))
            .unwrap()
    }

    fn set_cookie(response: &Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_feed_without_token_is_unauthorized_and_skips_upstream() {
        let h = harness();

        let response = h.send(get_feed("/api/feed", None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(h.source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_feed_with_invalid_token_is_forbidden() {
        let h = harness();

        let response = h.send(get_feed("/api/feed", Some("garbage"))).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(h.source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_feed_forwards_paging_and_normalizes() {
        let posts = vec![RawPost {
            id: Some("abc".to_string()),
            permalink: Some("/r/pics/comments/abc/".to_string()),
            url: Some("https://i.redd.it/abc.png".to_string()),
            ..Default::default()
        }];
        let h = harness_with(Some(StubFeedSource::with_posts(
            posts,
            Some("t3_abc2".to_string()),
        )));
        let token = h.access_token();

        let response = h
            .send(get_feed("/api/feed?after=t3_abc&limit=5", Some(&token)))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            h.source.requests(),
            vec![FeedRequest {
                after: Some("t3_abc".to_string()),
                limit: 5,
            }]
        );

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["nextPageToken"], json!("t3_abc2"));
        assert_eq!(body["data"][0]["id"], json!("abc"));
        assert_eq!(
            body["data"][0]["permalink"],
            json!("https://reddit.com/r/pics/comments/abc/")
        );
        assert_eq!(
            body["data"][0]["media"],
            json!({"type": "image", "url": "https://i.redd.it/abc.png"})
        );
    }

    #[tokio::test]
    async fn test_feed_defaults_limit_and_null_cursor() {
        let h = harness();
        let token = h.access_token();

        let response = h.send(get_feed("/api/feed", Some(&token))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.source.requests(), vec![FeedRequest::default()]);
        let body = body_json(response).await;
        assert_eq!(body["nextPageToken"], Value::Null);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_feed_upstream_failure_is_generic_500() {
        let h = harness_with(Some(StubFeedSource::failing(502)));
        let token = h.access_token();

        let response = h.send(get_feed("/api/feed", Some(&token))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to fetch feed"})
        );
    }

    #[tokio::test]
    async fn test_feed_without_upstream_is_config_error() {
        let h = harness();
        let state = AppState {
            feed: FeedUseCase::unconfigured(),
            session: SessionUseCase::new(
                Arc::new(StaticCredentialStore::new(
                    "admin",
                    &SecretString::new("hunter2".into()),
                )),
                h.tokens.clone(),
            ),
            cookie: RefreshCookie::default(),
        };
        let router = create_router(state, &RouterOptions::default());

        let response = router
            .oneshot(get_feed("/api/feed", Some(&h.access_token())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Missing upstream feed URL"})
        );
    }

    #[tokio::test]
    async fn test_login_sets_refresh_cookie() {
        let h = harness();

        let response = h.send(login_request("admin", "hunter2")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("refreshToken="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));

        let body = body_json(response).await;
        let access = body["accessToken"].as_str().unwrap();
        assert_eq!(h.tokens.verify_access(access).unwrap().username, "admin");
    }

    #[tokio::test]
    async fn test_login_with_bad_credentials() {
        let h = harness();

        let response = h.send(login_request("admin", "nope")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_empty());
    }

    #[tokio::test]
    async fn test_refresh_status_codes() {
        let h = harness();

        let missing = h
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        // An access token is not a refresh token
        let wrong_kind = h
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header(
                        header::COOKIE,
                        format!("refreshToken={}", h.access_token()),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(wrong_kind.status(), StatusCode::FORBIDDEN);

        let expired = h
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header(
                        header::COOKIE,
                        format!("refreshToken={}", expired_refresh_token()),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(expired.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_login_with_unrepresentable_lifetime_is_500() {
        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::new("access-secret".into()),
            &SecretString::new("refresh-secret".into()),
            TokenTtl {
                access: time::Duration::minutes(15),
                refresh: time::Duration::seconds(i64::MAX),
            },
            Arc::new(SystemClock),
        ));
        let credentials = Arc::new(StaticCredentialStore::new(
            "admin",
            &SecretString::new("hunter2".into()),
        ));
        let state = AppState {
            feed: FeedUseCase::unconfigured(),
            session: SessionUseCase::new(credentials, tokens),
            cookie: RefreshCookie::default(),
        };

        let response = create_router(state, &RouterOptions::default())
            .oneshot(login_request("admin", "hunter2"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(set_cookie(&response).is_empty());
    }

    #[tokio::test]
    async fn test_login_then_refresh() {
        let h = harness();

        let login = h.send(login_request("admin", "hunter2")).await;
        let cookie = set_cookie(&login);
        let pair = cookie.split(';').next().unwrap().to_string();

        let response = h
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header(header::COOKIE, pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let access = body["accessToken"].as_str().unwrap();
        assert!(h.tokens.verify_access(access).is_ok());
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let h = harness();

        let response = h
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("refreshToken="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();

        let response = h
            .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }
}
