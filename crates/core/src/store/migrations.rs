//! SQLite schema migrations.

use rusqlite::Connection;
use tracing::info;

use crate::errors::CoreError;

/// Run all migrations not yet applied.
pub fn run_migrations(conn: &Connection) -> Result<(), CoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_assets", CREATE_ASSETS_TABLE)?;
    run_migration(conn, "002_transactions", CREATE_TRANSACTIONS_TABLE)?;
    run_migration(conn, "003_alerts", CREATE_ALERTS_TABLE)?;
    run_migration(conn, "004_settings", CREATE_SETTINGS_TABLE)?;

    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<(), CoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_ASSETS_TABLE: &str = r#"
CREATE TABLE assets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'equity'
        CHECK(category IN ('equity','crypto','etf','fixed_income','other_variable','other_fixed'))
);
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    symbol TEXT NOT NULL REFERENCES assets(symbol),
    price REAL NOT NULL,
    quantity REAL NOT NULL,
    commission REAL NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_transactions_symbol ON transactions(symbol);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
"#;

const CREATE_ALERTS_TABLE: &str = r#"
CREATE TABLE alerts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
    symbol TEXT NOT NULL REFERENCES assets(symbol),
    kind TEXT NOT NULL CHECK(kind IN ('buy_opportunity','overbought')),
    price_at_alert REAL NOT NULL,
    reference_price REAL NOT NULL,
    deviation_pct REAL NOT NULL,
    message TEXT NOT NULL,
    read_flag INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_alerts_symbol_kind ON alerts(symbol, kind);
"#;

const CREATE_SETTINGS_TABLE: &str = r#"
CREATE TABLE settings (
    id INTEGER PRIMARY KEY CHECK(id = 1),
    display_currency TEXT NOT NULL DEFAULT 'MXN' CHECK(display_currency IN ('USD','MXN'))
);
INSERT INTO settings (id, display_currency) VALUES (1, 'MXN');
"#;
