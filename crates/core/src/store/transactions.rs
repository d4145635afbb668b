//! Append-only transaction log access.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::errors::CoreError;
use crate::models::transaction::Transaction;

const DATE_FMT: &str = "%Y-%m-%d";

/// Insert a validated transaction and return it with its generated id.
/// The symbol must already exist in `assets` (callers go through
/// `Database::record_transaction`, which ensures it).
pub fn insert_transaction(
    conn: &Connection,
    date: NaiveDate,
    symbol: &str,
    price: f64,
    quantity: f64,
    commission: f64,
) -> Result<Transaction, CoreError> {
    conn.execute(
        "INSERT INTO transactions (date, symbol, price, quantity, commission)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![date.format(DATE_FMT).to_string(), symbol, price, quantity, commission],
    )?;
    let id = conn.last_insert_rowid();
    Ok(Transaction {
        id,
        date,
        symbol: symbol.to_string(),
        price,
        quantity,
        commission,
    })
}

/// All transactions, oldest first. Optionally filtered to one symbol.
pub fn list_transactions(
    conn: &Connection,
    symbol: Option<&str>,
) -> Result<Vec<Transaction>, CoreError> {
    let mut transactions = Vec::new();
    match symbol {
        Some(symbol) => {
            let mut stmt = conn.prepare(
                "SELECT id, date, symbol, price, quantity, commission
                 FROM transactions WHERE symbol = ?1 ORDER BY date, id",
            )?;
            let rows = stmt.query_map([symbol], map_transaction)?;
            for row in rows {
                transactions.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, date, symbol, price, quantity, commission
                 FROM transactions ORDER BY date, id",
            )?;
            let rows = stmt.query_map([], map_transaction)?;
            for row in rows {
                transactions.push(row?);
            }
        }
    }
    Ok(transactions)
}

/// Distinct symbols appearing in the log, ordered.
pub fn list_symbols(conn: &Connection) -> Result<Vec<String>, CoreError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT symbol FROM transactions ORDER BY symbol")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut symbols = Vec::new();
    for row in rows {
        symbols.push(row?);
    }
    Ok(symbols)
}

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })?;
    Ok(Transaction {
        id: row.get(0)?,
        date,
        symbol: row.get(2)?,
        price: row.get(3)?,
        quantity: row.get(4)?,
        commission: row.get(5)?,
    })
}
