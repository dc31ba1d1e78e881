//! Session use case - login, bearer authentication and access token refresh

use std::sync::Arc;

use crate::{
    model::{Principal, TokenPair},
    ports::{AuthError, CredentialStore, TokenService},
};

#[derive(Clone)]
pub struct SessionUseCase {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenService>,
}

impl SessionUseCase {
    pub fn new(credentials: Arc<dyn CredentialStore>, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    /// Check credentials and issue an access/refresh pair
    pub fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(principal) = self.credentials.verify(username, password) else {
            tracing::warn!(username = %username, "Login rejected");
            return Err(AuthError::BadCredentials);
        };

        tracing::info!(username = %principal.username, "Login succeeded");
        self.tokens.issue(&principal)
    }

    /// Resolve a bearer token to a principal
    pub fn authenticate(&self, access_token: Option<&str>) -> Result<Principal, AuthError> {
        let token = access_token.ok_or(AuthError::MissingToken)?;
        self.tokens.verify_access(token)
    }

    /// Mint a new access token from a refresh token
    pub fn refresh(&self, refresh_token: Option<&str>) -> Result<String, AuthError> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;
        let principal = self.tokens.verify_refresh(token)?;

        tracing::debug!(username = %principal.username, "Refreshing access token");
        self.tokens.issue_access(&principal)
    }
}
