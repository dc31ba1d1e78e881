//! feed-proxy domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Raw upstream records and normalized output types
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Media classification, normalization, feed and session flows

pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
