//! stocklist - Stock Listing Data Pipeline
//!
//! Fetches a company-listing CSV from a remote quote API, caches the parsed
//! rows in SQLite, serves substring/symbol search from the cache, and
//! exposes intraday and company-overview detail feeds. The repository emits
//! progressive `Loading`/`Success`/`Error` states over an ordered channel;
//! a debounced coordinator handles rapid query changes.

pub mod config;
pub mod csv_parser;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod repository;
pub mod resource;
pub mod search;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for binaries and integration harnesses
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stocklist=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
