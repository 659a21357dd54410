//! Stock repository
//!
//! Orchestrates the local store and the remote source behind a single
//! asynchronous query with a load-then-optionally-refresh protocol. The
//! consumer never observes data that did not pass through the local store:
//! a remote fetch is written to SQLite and then re-read, so what is
//! displayed always equals what is persisted.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task;

use crate::csv_parser::{CompanyListingsParser, CsvParser, IntradayParser};
use crate::db::sqlite::SqliteDb;
use crate::error::{AppError, Result};
use crate::models::{CompanyInfo, CompanyListing, IntradayInfo};
use crate::remote::StockApi;
use crate::resource::Resource;

/// Terminal message for transport or decode failures
pub const LOAD_ERROR: &str = "Couldn't load data.";
/// Terminal message for non-2xx responses
pub const RESPONSE_ERROR: &str = "Response failure.";

/// Emission channel for one listings invocation
pub type ListingsReceiver = mpsc::Receiver<Resource<Vec<CompanyListing>>>;

/// Cache-coordinated stock repository
pub struct StockRepository {
    api: Arc<dyn StockApi>,
    db: Arc<SqliteDb>,
    listings_parser: Arc<dyn CsvParser<CompanyListing>>,
    intraday_parser: Arc<dyn CsvParser<IntradayInfo>>,
}

impl StockRepository {
    pub fn new(api: Arc<dyn StockApi>, db: Arc<SqliteDb>) -> Self {
        Self {
            api,
            db,
            listings_parser: Arc::new(CompanyListingsParser),
            intraday_parser: Arc::new(IntradayParser),
        }
    }

    /// Query company listings, emitting progressive states in strict order:
    ///
    /// 1. `Loading(true)`, unconditionally.
    /// 2. `Success(cached)` for the caller's query.
    /// 3. If the store had anything useful and no refresh was forced:
    ///    `Loading(false)` and done — the remote source is never touched.
    /// 4. Otherwise fetch, replace the store wholesale, re-read with an
    ///    empty query and emit `Success(full set)` then `Loading(false)`;
    ///    on failure emit one terminal `Error` and leave the cache alone.
    ///
    /// Each invocation runs as its own task; dropping the receiver abandons
    /// it at the next emission without committing partial writes.
    pub fn get_company_listings(&self, fetch_from_remote: bool, query: String) -> ListingsReceiver {
        let (tx, rx) = mpsc::channel(8);
        let api = Arc::clone(&self.api);
        let db = Arc::clone(&self.db);
        let parser = Arc::clone(&self.listings_parser);

        tokio::spawn(async move {
            if tx.send(Resource::Loading(true)).await.is_err() {
                return;
            }

            let local = match search_local(&db, &query).await {
                Ok(listings) => listings,
                Err(e) => {
                    tracing::warn!("Local listing search failed: {}", e);
                    let _ = tx.send(Resource::error(LOAD_ERROR)).await;
                    return;
                }
            };

            // Empty result for a non-blank query just means nothing matched;
            // only a blank query against an empty store means "never fetched"
            let is_db_empty = local.is_empty() && query.trim().is_empty();
            if tx.send(Resource::Success(Some(local))).await.is_err() {
                return;
            }

            let should_just_load_from_cache = !is_db_empty && !fetch_from_remote;
            if should_just_load_from_cache {
                let _ = tx.send(Resource::Loading(false)).await;
                return;
            }

            let remote = match api.get_listings().await {
                Ok(bytes) => bytes,
                Err(AppError::Status(code)) => {
                    tracing::warn!("Listing refresh rejected with status {}", code);
                    let _ = tx.send(Resource::error(RESPONSE_ERROR)).await;
                    return;
                }
                Err(e) => {
                    tracing::warn!("Listing refresh failed: {}", e);
                    let _ = tx.send(Resource::error(LOAD_ERROR)).await;
                    return;
                }
            };

            // Decode, replace the cached generation, then read the full set
            // back from the store (single source of truth)
            let refreshed = task::spawn_blocking(move || -> Result<Vec<CompanyListing>> {
                let listings = parser.parse(&remote);
                db.replace_all_listings(&listings)?;
                db.search_listings("")
            })
            .await
            .map_err(|e| AppError::Internal(e.to_string()));

            match refreshed {
                Ok(Ok(listings)) => {
                    if tx.send(Resource::Success(Some(listings))).await.is_err() {
                        return;
                    }
                    let _ = tx.send(Resource::Loading(false)).await;
                }
                Ok(Err(e)) | Err(e) => {
                    tracing::warn!("Storing refreshed listings failed: {}", e);
                    let _ = tx.send(Resource::error(LOAD_ERROR)).await;
                }
            }
        });

        rx
    }

    /// Fetch and decode yesterday's intraday points for one symbol
    pub async fn get_intraday_info(&self, symbol: &str) -> Result<Vec<IntradayInfo>> {
        let bytes = self.api.get_intraday_info(symbol).await?;
        let parser = Arc::clone(&self.intraday_parser);
        task::spawn_blocking(move || parser.parse(&bytes))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Fetch the company overview for one symbol
    pub async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        let dto = self.api.get_company_info(symbol).await?;
        Ok(dto.into_company_info())
    }
}

/// Run a store query on the blocking pool so database I/O never ties up the
/// async scheduler
async fn search_local(db: &Arc<SqliteDb>, query: &str) -> Result<Vec<CompanyListing>> {
    let db = Arc::clone(db);
    let query = query.to_string();
    task::spawn_blocking(move || db.search_listings(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::dto::CompanyInfoDto;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const LISTINGS_CSV: &str = "symbol,name,exchange\n\
                                TSLA,Tesla Inc,NASDAQ\n\
                                AAPL,Apple Inc,NASDAQ\n";

    enum FakeResponse {
        Body(Vec<u8>),
        Transport,
        Status(u16),
    }

    struct FakeApi {
        listings_calls: AtomicUsize,
        listings: FakeResponse,
        intraday: FakeResponse,
    }

    impl FakeApi {
        fn new(listings: FakeResponse) -> Self {
            Self {
                listings_calls: AtomicUsize::new(0),
                listings,
                intraday: FakeResponse::Body(Vec::new()),
            }
        }

        fn with_intraday(intraday: FakeResponse) -> Self {
            Self {
                listings_calls: AtomicUsize::new(0),
                listings: FakeResponse::Body(Vec::new()),
                intraday,
            }
        }
    }

    fn respond(response: &FakeResponse) -> Result<Vec<u8>> {
        match response {
            FakeResponse::Body(bytes) => Ok(bytes.clone()),
            FakeResponse::Transport => Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            FakeResponse::Status(code) => Err(AppError::Status(*code)),
        }
    }

    #[async_trait]
    impl StockApi for FakeApi {
        async fn get_listings(&self) -> Result<Vec<u8>> {
            self.listings_calls.fetch_add(1, Ordering::SeqCst);
            respond(&self.listings)
        }

        async fn get_intraday_info(&self, _symbol: &str) -> Result<Vec<u8>> {
            respond(&self.intraday)
        }

        async fn get_company_info(&self, _symbol: &str) -> Result<CompanyInfoDto> {
            Ok(CompanyInfoDto {
                symbol: Some("TSLA".to_string()),
                name: Some("Tesla Inc".to_string()),
                ..CompanyInfoDto::default()
            })
        }
    }

    fn listing(name: &str, symbol: &str, exchange: &str) -> CompanyListing {
        CompanyListing {
            name: name.to_string(),
            symbol: symbol.to_string(),
            exchange: exchange.to_string(),
        }
    }

    fn setup(dir: &TempDir, api: FakeApi) -> (Arc<FakeApi>, Arc<SqliteDb>, StockRepository) {
        let api = Arc::new(api);
        let db = Arc::new(SqliteDb::new(&dir.path().join("stocklist.db")).unwrap());
        let repository = StockRepository::new(api.clone(), db.clone());
        (api, db, repository)
    }

    async fn collect(mut rx: ListingsReceiver) -> Vec<Resource<Vec<CompanyListing>>> {
        let mut emissions = Vec::new();
        while let Some(state) = rx.recv().await {
            emissions.push(state);
        }
        emissions
    }

    #[tokio::test]
    async fn test_cached_blank_query_skips_the_remote_source() {
        let dir = TempDir::new().unwrap();
        let (api, db, repository) = setup(&dir, FakeApi::new(FakeResponse::Transport));
        let cached = vec![listing("Tesla Inc", "TSLA", "NASDAQ")];
        db.replace_all_listings(&cached).unwrap();

        let emissions = collect(repository.get_company_listings(false, String::new())).await;

        assert_eq!(
            emissions,
            vec![
                Resource::Loading(true),
                Resource::Success(Some(cached)),
                Resource::Loading(false),
            ]
        );
        assert_eq!(api.listings_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missed_non_blank_query_also_skips_the_remote_source() {
        let dir = TempDir::new().unwrap();
        let (api, db, repository) = setup(&dir, FakeApi::new(FakeResponse::Transport));
        db.replace_all_listings(&[listing("Tesla Inc", "TSLA", "NASDAQ")])
            .unwrap();

        // Nothing matches, but the store is not empty and the query is not
        // blank, so this is an ordinary cache miss rather than a cold start
        let emissions =
            collect(repository.get_company_listings(false, "zzzzzzz".to_string())).await;

        assert_eq!(
            emissions,
            vec![
                Resource::Loading(true),
                Resource::Success(Some(Vec::new())),
                Resource::Loading(false),
            ]
        );
        assert_eq!(api.listings_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_forced_refresh_replaces_the_store_and_emits_the_full_set() {
        let dir = TempDir::new().unwrap();
        let (api, db, repository) = setup(
            &dir,
            FakeApi::new(FakeResponse::Body(LISTINGS_CSV.as_bytes().to_vec())),
        );
        let old = vec![listing("Old Corp", "OLD", "NYSE")];
        db.replace_all_listings(&old).unwrap();

        let emissions = collect(repository.get_company_listings(true, String::new())).await;

        let fresh = vec![
            listing("Tesla Inc", "TSLA", "NASDAQ"),
            listing("Apple Inc", "AAPL", "NASDAQ"),
        ];
        assert_eq!(
            emissions,
            vec![
                Resource::Loading(true),
                Resource::Success(Some(old)),
                Resource::Success(Some(fresh.clone())),
                Resource::Loading(false),
            ]
        );
        // No merge with the prior generation
        assert_eq!(db.search_listings("").unwrap(), fresh);
        assert_eq!(api.listings_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_store_with_blank_query_fetches_without_force() {
        let dir = TempDir::new().unwrap();
        let (api, _db, repository) = setup(
            &dir,
            FakeApi::new(FakeResponse::Body(LISTINGS_CSV.as_bytes().to_vec())),
        );

        let emissions = collect(repository.get_company_listings(false, String::new())).await;

        assert_eq!(emissions.len(), 4);
        assert_eq!(emissions[0], Resource::Loading(true));
        assert_eq!(emissions[1], Resource::Success(Some(Vec::new())));
        assert_eq!(emissions[3], Resource::Loading(false));
        assert_eq!(api.listings_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_terminal_and_leaves_the_cache_alone() {
        let dir = TempDir::new().unwrap();
        let (_api, db, repository) = setup(&dir, FakeApi::new(FakeResponse::Transport));
        let cached = vec![listing("Tesla Inc", "TSLA", "NASDAQ")];
        db.replace_all_listings(&cached).unwrap();

        let emissions = collect(repository.get_company_listings(true, String::new())).await;

        assert_eq!(
            emissions,
            vec![
                Resource::Loading(true),
                Resource::Success(Some(cached.clone())),
                Resource::error(LOAD_ERROR),
            ]
        );
        assert_eq!(db.search_listings("").unwrap(), cached);
    }

    #[tokio::test]
    async fn test_response_failure_message_for_non_2xx_status() {
        let dir = TempDir::new().unwrap();
        let (_api, _db, repository) = setup(&dir, FakeApi::new(FakeResponse::Status(400)));

        let emissions = collect(repository.get_company_listings(true, String::new())).await;

        assert_eq!(emissions.last(), Some(&Resource::error(RESPONSE_ERROR)));
        assert_eq!(emissions.len(), 3);
    }

    #[tokio::test]
    async fn test_intraday_info_is_filtered_and_sorted() {
        let yesterday = chrono::Local::now().naive_local() - chrono::Duration::days(1);
        let today = chrono::Local::now().naive_local();
        let day = |ts: chrono::NaiveDateTime, h: u32, close: f64| {
            format!(
                "{} {:02}:00:00,1,1,1,{},10\n",
                ts.format("%Y-%m-%d"),
                h,
                close
            )
        };
        let csv = format!(
            "timestamp,open,high,low,close,volume\n{}{}{}",
            day(today, 9, 101.0),
            day(yesterday, 16, 100.0),
            day(yesterday, 9, 99.0),
        );

        let dir = TempDir::new().unwrap();
        let (_api, _db, repository) = setup(
            &dir,
            FakeApi::with_intraday(FakeResponse::Body(csv.into_bytes())),
        );

        let points = repository.get_intraday_info("TSLA").await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 99.0);
        assert_eq!(points[1].close, 100.0);
    }

    #[tokio::test]
    async fn test_company_info_maps_the_dto() {
        let dir = TempDir::new().unwrap();
        let (_api, _db, repository) = setup(&dir, FakeApi::new(FakeResponse::Transport));

        let info = repository.get_company_info("TSLA").await.unwrap();
        assert_eq!(info.symbol, "TSLA");
        assert_eq!(info.name, "Tesla Inc");
        assert_eq!(info.country, "");
    }
}
