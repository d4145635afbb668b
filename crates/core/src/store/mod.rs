//! SQLite persistence: asset catalog, append-only transaction and alert
//! logs, and the settings row.
//!
//! One shared connection behind a mutex — concurrent readers are fine at
//! the SQLite level (WAL), writers queue on the lock.

mod alerts;
mod assets;
mod migrations;
mod settings;
mod transactions;

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

use crate::errors::CoreError;
use crate::models::alert::{AlertKind, AlertRecord, AlertStats, NewAlert};
use crate::models::asset::{Asset, AssetCategory};
use crate::models::settings::Currency;
use crate::models::transaction::{NewTransaction, Transaction};

/// SQLite database wrapper. All rows cross this boundary as named
/// structs — no positional tuples leak out.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) a database file and run migrations.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory database, for tests and ephemeral runs.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::run_migrations(&conn)?;
        info!("database ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        f(&conn)
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// Register an asset explicitly (name and category supplied).
    pub fn register_asset(
        &self,
        symbol: &str,
        name: &str,
        category: AssetCategory,
    ) -> Result<(), CoreError> {
        self.with_conn(|conn| assets::ensure_asset(conn, symbol, name, category))
    }

    pub fn get_asset(&self, symbol: &str) -> Result<Option<Asset>, CoreError> {
        self.with_conn(|conn| assets::get_asset(conn, symbol))
    }

    pub fn list_assets(&self) -> Result<Vec<Asset>, CoreError> {
        self.with_conn(|conn| assets::list_assets(conn))
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Validate and append a transaction. The asset row is created
    /// lazily on first sight of the symbol (name defaults to the symbol).
    /// Rejection leaves no partial write behind.
    pub fn record_transaction(&self, tx: &NewTransaction) -> Result<Transaction, CoreError> {
        let symbol = tx.validate()?;
        self.with_conn(|conn| {
            assets::ensure_asset(conn, &symbol, &symbol, AssetCategory::Equity)?;
            transactions::insert_transaction(
                conn,
                tx.date,
                &symbol,
                tx.price,
                tx.quantity,
                tx.commission,
            )
        })
    }

    /// The full log (oldest first), or one symbol's slice of it.
    pub fn transactions(&self, symbol: Option<&str>) -> Result<Vec<Transaction>, CoreError> {
        let normalized = symbol.map(str::to_uppercase);
        self.with_conn(|conn| transactions::list_transactions(conn, normalized.as_deref()))
    }

    /// Distinct symbols appearing in the transaction log.
    pub fn symbols(&self) -> Result<Vec<String>, CoreError> {
        self.with_conn(transactions::list_symbols)
    }

    // ── Alerts ──────────────────────────────────────────────────────

    pub fn insert_alert(&self, alert: &NewAlert) -> Result<AlertRecord, CoreError> {
        self.with_conn(|conn| alerts::insert_alert(conn, alert))
    }

    pub fn alerts(
        &self,
        symbol: Option<&str>,
        unread_only: bool,
    ) -> Result<Vec<AlertRecord>, CoreError> {
        let normalized = symbol.map(str::to_uppercase);
        self.with_conn(|conn| alerts::list_alerts(conn, normalized.as_deref(), unread_only))
    }

    pub fn latest_alert(
        &self,
        symbol: &str,
        kind: AlertKind,
    ) -> Result<Option<AlertRecord>, CoreError> {
        let upper = symbol.to_uppercase();
        self.with_conn(|conn| alerts::latest_alert(conn, &upper, kind))
    }

    pub fn mark_alert_read(&self, id: i64) -> Result<(), CoreError> {
        self.with_conn(|conn| alerts::mark_alert_read(conn, id))
    }

    pub fn alert_stats(&self, symbol: Option<&str>) -> Result<AlertStats, CoreError> {
        let normalized = symbol.map(str::to_uppercase);
        self.with_conn(|conn| alerts::alert_stats(conn, normalized.as_deref()))
    }

    // ── Settings ────────────────────────────────────────────────────

    pub fn display_currency(&self) -> Result<Currency, CoreError> {
        self.with_conn(settings::get_display_currency)
    }

    pub fn set_display_currency(&self, currency: Currency) -> Result<(), CoreError> {
        self.with_conn(|conn| settings::set_display_currency(conn, currency))
    }

    /// Earliest transaction date across the whole log, if any.
    pub fn earliest_transaction_date(&self) -> Result<Option<NaiveDate>, CoreError> {
        Ok(self.transactions(None)?.first().map(|t| t.date))
    }
}
