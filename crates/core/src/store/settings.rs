//! Persisted user settings (single row, id = 1).

use rusqlite::Connection;

use crate::errors::CoreError;
use crate::models::settings::Currency;

pub fn get_display_currency(conn: &Connection) -> Result<Currency, CoreError> {
    let code: String = conn.query_row(
        "SELECT display_currency FROM settings WHERE id = 1",
        [],
        |row| row.get(0),
    )?;
    Currency::parse(&code)
}

pub fn set_display_currency(conn: &Connection, currency: Currency) -> Result<(), CoreError> {
    conn.execute(
        "UPDATE settings SET display_currency = ?1 WHERE id = 1",
        [currency.code()],
    )?;
    Ok(())
}
