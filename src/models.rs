//! Domain models
//!
//! Value objects shared across the pipeline. None of these carry a storage
//! identifier; the surrogate key lives in `db::sqlite` and stays there, so
//! swapping the persistence layer never touches domain code.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A company's name/symbol/exchange triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyListing {
    pub name: String,
    pub symbol: String,
    pub exchange: String,
}

/// One timestamp/closing-price sample for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayInfo {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

/// Company overview from the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub description: String,
    pub name: String,
    pub country: String,
    pub industry: String,
}
