//! Company listings feed decoder

use crate::models::CompanyListing;

use super::CsvParser;

/// Decoder for the listing-status CSV: positional columns
/// 0=symbol, 1=name, 2=exchange.
#[derive(Debug, Default)]
pub struct CompanyListingsParser;

impl CsvParser<CompanyListing> for CompanyListingsParser {
    fn parse(&self, bytes: &[u8]) -> Vec<CompanyListing> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let listings: Vec<CompanyListing> = reader
            .records()
            // Unreadable rows are as good as absent
            .filter_map(|record| record.ok())
            .filter_map(|record| {
                let symbol = record.get(0)?;
                let name = record.get(1)?;
                let exchange = record.get(2)?;
                Some(CompanyListing {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                    exchange: exchange.to_string(),
                })
            })
            .collect();

        tracing::debug!("Decoded {} company listings", listings.len());
        listings
    }
}
