//! CSV decoding module
//!
//! Turns raw CSV payloads from the quote API into typed records. Malformed
//! rows are dropped, never surfaced: a data-quality failure in one row must
//! not abort a whole refresh.

mod intraday;
mod listings;

pub use intraday::IntradayParser;
pub use listings::CompanyListingsParser;

/// Parser seam so the repository depends on the abstraction, not on a
/// concrete column layout. One implementation per feed.
pub trait CsvParser<T>: Send + Sync {
    /// Decode a full CSV payload. The header row is always skipped; rows
    /// missing required fields are discarded. Never panics, never errors.
    fn parse(&self, bytes: &[u8]) -> Vec<T>;
}
