//! Authentication adapters

mod credentials;
mod jwt;

pub use credentials::StaticCredentialStore;
pub use jwt::{JwtTokenService, TokenTtl};
