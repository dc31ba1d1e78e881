//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use feed_proxy_domain::AuthError;
use feed_proxy_domain::usecases::FeedError;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Missing upstream feed URL")]
    NotConfigured,

    #[error("Failed to fetch feed")]
    Upstream,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotConfigured | ApiError::Upstream | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::BadCredentials => ApiError::Unauthorized,
            AuthError::InvalidToken(_) | AuthError::ExpiredToken => ApiError::Forbidden,
            AuthError::Signing(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::NotConfigured => ApiError::NotConfigured,
            FeedError::Source(_) => ApiError::Upstream,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Auth failures carry no body; internal details never leave the process.
        let message = match &self {
            ApiError::Unauthorized | ApiError::Forbidden => return status.into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
