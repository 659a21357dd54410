//! API configuration
//!
//! The quote API takes the key as a query parameter; it is configuration,
//! never user input.

use crate::error::{AppError, Result};

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Connection settings for the remote quote API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// `STOCKLIST_API_KEY` is required; `STOCKLIST_BASE_URL` overrides the
    /// default endpoint (useful for pointing tests at a local server).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("STOCKLIST_API_KEY")
            .map_err(|_| AppError::Config("STOCKLIST_API_KEY is not set".to_string()))?;

        let base_url =
            std::env::var("STOCKLIST_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self { base_url, api_key })
    }
}
