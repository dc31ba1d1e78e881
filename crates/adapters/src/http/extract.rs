//! Bearer token extractor.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use feed_proxy_domain::Principal;

use super::AppState;
use super::error::ApiError;

/// Authenticated caller, resolved from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers);

        let principal = state.session.authenticate(token).map_err(|e| {
            tracing::debug!(error = %e, path = %parts.uri.path(), "Rejected request");
            ApiError::from(e)
        })?;

        Ok(Self(principal))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
