//! # Sheet Config Library
//!
//! Serves a spreadsheet as a typed key/value configuration store,
//! keeping an OAuth2 access token alive in the background.
//!
//! Modules:
//! - `config`: service configuration and validation
//! - `credentials`: token, durable credential store, OAuth client file
//! - `sources`: identity provider client, spreadsheet fetcher, token renewal loop
//! - `parser`: coercion of raw cells into typed values
//! - `cache`: per-sheet snapshots with TTL freshness
//! - `endpoints`, `server`: http surface

pub mod cache;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod parser;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::sources::ServiceConfig;
pub use crate::parser::coerce::{coerce, ConfigValue};
