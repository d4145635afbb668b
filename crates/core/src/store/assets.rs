//! Asset catalog access.

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::CoreError;
use crate::models::asset::{Asset, AssetCategory};

/// Insert an asset if its symbol is not already known.
/// Existing rows win — a later insert never overwrites name or category.
pub fn ensure_asset(
    conn: &Connection,
    symbol: &str,
    name: &str,
    category: AssetCategory,
) -> Result<(), CoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO assets (symbol, name, category) VALUES (?1, ?2, ?3)",
        params![symbol, name, category.as_str()],
    )?;
    Ok(())
}

pub fn get_asset(conn: &Connection, symbol: &str) -> Result<Option<Asset>, CoreError> {
    let asset = conn
        .query_row(
            "SELECT symbol, name, category FROM assets WHERE symbol = ?1",
            [symbol],
            map_asset,
        )
        .optional()?;
    Ok(asset)
}

pub fn list_assets(conn: &Connection) -> Result<Vec<Asset>, CoreError> {
    let mut stmt =
        conn.prepare("SELECT symbol, name, category FROM assets ORDER BY symbol")?;
    let rows = stmt.query_map([], map_asset)?;
    let mut assets = Vec::new();
    for row in rows {
        assets.push(row?);
    }
    Ok(assets)
}

fn map_asset(row: &rusqlite::Row<'_>) -> rusqlite::Result<Asset> {
    let category: String = row.get(2)?;
    Ok(Asset {
        symbol: row.get(0)?,
        name: row.get(1)?,
        category: AssetCategory::parse(&category).unwrap_or(AssetCategory::Equity),
    })
}
