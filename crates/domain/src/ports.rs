//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{FeedRequest, Listing, Principal, TokenPair};

/// Error type for feed source operations
#[derive(Debug, Error)]
pub enum FeedSourceError {
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream returned status {0}")]
    Status(u16),
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Port for fetching one page of raw posts from the upstream platform
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, request: &FeedRequest) -> Result<Listing, FeedSourceError>;
}

/// Error type for authentication operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token expired")]
    ExpiredToken,
    #[error("Invalid username or password")]
    BadCredentials,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Port for issuing and verifying signed tokens
pub trait TokenService: Send + Sync {
    /// Issue a fresh access/refresh pair for a principal
    fn issue(&self, principal: &Principal) -> Result<TokenPair, AuthError>;

    /// Issue a new access token only
    fn issue_access(&self, principal: &Principal) -> Result<String, AuthError>;

    /// Verify a short-lived access token
    fn verify_access(&self, token: &str) -> Result<Principal, AuthError>;

    /// Verify a refresh token
    fn verify_refresh(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Port for checking login credentials
pub trait CredentialStore: Send + Sync {
    /// Returns the principal when the credentials are valid
    fn verify(&self, username: &str, password: &str) -> Option<Principal>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
