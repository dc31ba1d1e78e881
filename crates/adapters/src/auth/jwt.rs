//! HS256 JWT token service

use feed_proxy_domain::{AuthError, Clock, Principal, TokenPair, TokenService};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Duration;
use uuid::Uuid;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
    kind: TokenKind,
}

/// Lifetimes of issued tokens
#[derive(Debug, Clone, Copy)]
pub struct TokenTtl {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenTtl {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        }
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }
}

/// Token service signing access and refresh tokens with separate secrets
pub struct JwtTokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    ttl: TokenTtl,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(
        access_secret: &SecretString,
        refresh_secret: &SecretString,
        ttl: TokenTtl,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            ttl,
            clock,
        }
    }

    fn sign(&self, principal: &Principal, kind: TokenKind) -> Result<String, AuthError> {
        let (keys, ttl) = match kind {
            TokenKind::Access => (&self.access, self.ttl.access),
            TokenKind::Refresh => (&self.refresh, self.ttl.refresh),
        };

        let now = self.clock.now();
        let expires = now
            .checked_add(ttl)
            .ok_or_else(|| AuthError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: principal.username.clone(),
            iat: now.unix_timestamp(),
            exp: expires.unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        };

        encode(&Header::new(ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<Principal, AuthError> {
        let keys = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.kind != kind {
            return Err(AuthError::InvalidToken("wrong token kind".to_string()));
        }

        Ok(Principal {
            username: data.claims.sub,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.sign(principal, TokenKind::Access)?,
            refresh_token: self.sign(principal, TokenKind::Refresh)?,
        })
    }

    fn issue_access(&self, principal: &Principal) -> Result<String, AuthError> {
        self.sign(principal, TokenKind::Access)
    }

    fn verify_access(&self, token: &str) -> Result<Principal, AuthError> {
        self.verify(token, TokenKind::Access)
    }

    fn verify_refresh(&self, token: &str) -> Result<Principal, AuthError> {
        self.verify(token, TokenKind::Refresh)
    }
}
