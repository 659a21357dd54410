//! Remote quote API client

pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

use dto::CompanyInfoDto;

/// Remote source seam. The repository depends on this trait so tests can
/// substitute a fake and count calls.
#[async_trait]
pub trait StockApi: Send + Sync {
    /// Fetch the full company-listing CSV payload
    async fn get_listings(&self) -> Result<Vec<u8>>;

    /// Fetch the intraday time-series CSV payload for one symbol
    async fn get_intraday_info(&self, symbol: &str) -> Result<Vec<u8>>;

    /// Fetch the company overview for one symbol
    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfoDto>;
}

/// Quote API client (Alpha Vantage query-style endpoints)
pub struct AlphaVantageApi {
    client: Client,
    config: ApiConfig,
}

impl AlphaVantageApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, config })
    }

    /// Issue one GET against the `query` endpoint and return the raw body.
    /// A non-2xx status is surfaced as [`AppError::Status`].
    async fn get_csv(&self, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/query", self.config.base_url))
            .query(params)
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl StockApi for AlphaVantageApi {
    async fn get_listings(&self) -> Result<Vec<u8>> {
        self.get_csv(&[("function", "LISTING_STATUS")]).await
    }

    async fn get_intraday_info(&self, symbol: &str) -> Result<Vec<u8>> {
        self.get_csv(&[
            ("function", "TIME_SERIES_INTRADAY"),
            ("interval", "60min"),
            ("datatype", "csv"),
            ("symbol", symbol),
        ])
        .await
    }

    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfoDto> {
        let response = self
            .client
            .get(format!("{}/query", self.config.base_url))
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status.as_u16()));
        }

        Ok(response.json::<CompanyInfoDto>().await?)
    }
}
