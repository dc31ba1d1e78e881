//! Request handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use feed_proxy_domain::{DEFAULT_PAGE_LIMIT, FeedRequest, NormalizedPost};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiResult;
use super::extract::AuthUser;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    after: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    success: bool,
    next_page_token: Option<String>,
    data: Vec<NormalizedPost>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// `GET /api/feed`
pub async fn get_feed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<FeedResponse>> {
    let request = FeedRequest {
        after: query.after.filter(|after| !after.is_empty()),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    };

    tracing::debug!(user = %user.username, after = ?request.after, limit = request.limit, "Feed requested");

    let page = state.feed.fetch(&request).await.inspect_err(|e| {
        tracing::error!(error = %e, "Feed error");
    })?;

    Ok(Json(FeedResponse {
        success: true,
        next_page_token: page.next_page_token,
        data: page.posts,
    }))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AccessTokenResponse>)> {
    let pair = state.session.login(&body.username, &body.password)?;

    let cookie = Cookie::build((state.cookie.name.clone(), pair.refresh_token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.cookie.secure)
        .path("/")
        .max_age(state.cookie.max_age);

    Ok((
        jar.add(cookie),
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    ))
}

/// `POST /refresh`
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<Json<AccessTokenResponse>> {
    let refresh_token = jar.get(&state.cookie.name).map(|cookie| cookie.value());
    let access_token = state.session.refresh(refresh_token)?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = Cookie::build((state.cookie.name.clone(), "")).path("/");
    (StatusCode::NO_CONTENT, jar.remove(removal))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
