//! Company listing queries

use rusqlite::{params, Connection};

use crate::error::Result;

use super::models::ListingRow;

/// Replace the whole listing generation: transactionally delete every row,
/// then bulk-insert the new set with a prepared statement. Readers see
/// either the old generation or the new one, never a mix.
pub fn replace_all(conn: &mut Connection, rows: &[ListingRow]) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM company_listings", [])?;

    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO company_listings (id, name, symbol, exchange)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    for row in rows {
        stmt.execute(params![row.id, row.name, row.symbol, row.exchange])?;
    }

    drop(stmt);
    tx.commit()?;

    tracing::info!("Stored {} company listings", rows.len());
    Ok(())
}

/// Search by case-insensitive name substring or exact (case-normalized)
/// symbol. An empty query matches every row, so one query box serves both
/// fuzzy name search and exact ticker lookup.
pub fn search(conn: &Connection, query: &str) -> Result<Vec<ListingRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, symbol, exchange
         FROM company_listings
         WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%' OR
             UPPER(?1) = symbol",
    )?;

    let rows = stmt
        .query_map(params![query], |row| {
            Ok(ListingRow {
                id: row.get(0)?,
                name: row.get(1)?,
                symbol: row.get(2)?,
                exchange: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Get listing count
pub fn count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM company_listings", [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
