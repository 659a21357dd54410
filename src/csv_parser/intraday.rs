//! Intraday time-series feed decoder

use chrono::{Datelike, Duration, Local, NaiveDateTime, Timelike};

use crate::models::IntradayInfo;

use super::CsvParser;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decoder for the per-symbol intraday CSV: column 0 is the timestamp,
/// column 4 the closing price. The decoded set is narrowed to the most
/// recently completed trading day and sorted ascending by hour.
#[derive(Debug, Default)]
pub struct IntradayParser;

impl IntradayParser {
    /// Decode relative to an explicit clock.
    ///
    /// "Yesterday" is compared by day-of-month only. The raw feed can span
    /// two calendar days depending on timezone skew; keeping a single day is
    /// the intended dedup heuristic, not a windowing scheme.
    pub fn parse_at(&self, bytes: &[u8], now: NaiveDateTime) -> Vec<IntradayInfo> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let yesterday = (now - Duration::days(1)).day();

        let mut points: Vec<IntradayInfo> = reader
            .records()
            .filter_map(|record| record.ok())
            .filter_map(|record| {
                let timestamp = record.get(0)?;
                let close = record.get(4)?;
                let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
                let close = close.parse::<f64>().ok()?;
                Some(IntradayInfo { timestamp, close })
            })
            .filter(|point| point.timestamp.day() == yesterday)
            .collect();

        points.sort_by_key(|point| point.timestamp.hour());

        tracing::debug!("Decoded {} intraday points", points.len());
        points
    }
}

impl CsvParser<IntradayInfo> for IntradayParser {
    fn parse(&self, bytes: &[u8]) -> Vec<IntradayInfo> {
        self.parse_at(bytes, Local::now().naive_local())
    }
}
