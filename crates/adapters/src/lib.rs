//! feed-proxy adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `reddit`: Upstream listing feed source (reqwest) and a stub for tests
//! - `auth`: JWT token service and single-user credential store
//! - `http`: Inbound axum API serving the normalized feed

pub mod auth;
pub mod http;
pub mod reddit;
