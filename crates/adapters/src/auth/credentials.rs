//! Single-user credential store

use feed_proxy_domain::{CredentialStore, Principal};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Accepts exactly one configured username/password pair
pub struct StaticCredentialStore {
    username: String,
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl StaticCredentialStore {
    pub fn new(username: impl Into<String>, password: &SecretString) -> Self {
        let username = username.into();
        Self {
            username_digest: digest(&username),
            password_digest: digest(password.expose_secret()),
            username,
        }
    }
}

/// Digests have a fixed length, so the comparison does not leak input length
fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl CredentialStore for StaticCredentialStore {
    fn verify(&self, username: &str, password: &str) -> Option<Principal> {
        let user_ok = self.username_digest[..].ct_eq(&digest(username)[..]);
        let pass_ok = self.password_digest[..].ct_eq(&digest(password)[..]);

        bool::from(user_ok & pass_ok).then(|| Principal {
            username: self.username.clone(),
        })
    }
}
