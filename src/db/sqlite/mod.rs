//! SQLite database module
//!
//! The local store is the single source of truth: everything the consumer
//! sees has been written here and read back. One table, fully replaceable.

mod listings;
mod migrations;
mod models;

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::error::Result;
use crate::models::CompanyListing;

use models::ListingRow;

/// SQLite database wrapper
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Create new SQLite database connection
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Listing Methods ==========

    /// Atomically replace every stored listing with the given set
    pub fn replace_all_listings(&self, new: &[CompanyListing]) -> Result<()> {
        let rows: Vec<ListingRow> = new.iter().map(ListingRow::from).collect();
        let mut conn = self.conn.lock();
        listings::replace_all(&mut conn, &rows)
    }

    /// Search listings by name substring or exact symbol
    pub fn search_listings(&self, query: &str) -> Result<Vec<CompanyListing>> {
        let conn = self.conn.lock();
        let rows = listings::search(&conn, query)?;
        Ok(rows.into_iter().map(CompanyListing::from).collect())
    }

    /// Get listing count
    pub fn count_listings(&self) -> Result<i64> {
        let conn = self.conn.lock();
        listings::count(&conn)
    }
}
