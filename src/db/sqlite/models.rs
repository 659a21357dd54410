//! Persisted row models
//!
//! These carry the store-assigned surrogate key and never cross the database
//! boundary; the public API of [`super::SqliteDb`] speaks domain types.

use crate::models::CompanyListing;

/// One row of the `company_listings` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    /// Surrogate key, assigned by SQLite on insert
    pub id: Option<i64>,
    pub name: String,
    pub symbol: String,
    pub exchange: String,
}

impl From<ListingRow> for CompanyListing {
    fn from(row: ListingRow) -> Self {
        CompanyListing {
            name: row.name,
            symbol: row.symbol,
            exchange: row.exchange,
        }
    }
}

impl From<&CompanyListing> for ListingRow {
    fn from(listing: &CompanyListing) -> Self {
        ListingRow {
            id: None,
            name: listing.name.clone(),
            symbol: listing.symbol.clone(),
            exchange: listing.exchange.clone(),
        }
    }
}
