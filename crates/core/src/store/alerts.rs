//! Alert log access. Append-only; the read flag is the only mutation.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::CoreError;
use crate::models::alert::{AlertKind, AlertRecord, AlertStats, NewAlert};

/// Insert an alert and return the stored record with id and timestamp.
pub fn insert_alert(conn: &Connection, alert: &NewAlert) -> Result<AlertRecord, CoreError> {
    let timestamp = Utc::now();
    conn.execute(
        "INSERT INTO alerts (timestamp, symbol, kind, price_at_alert, reference_price, deviation_pct, message)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            timestamp.to_rfc3339(),
            alert.symbol,
            alert.kind.as_str(),
            alert.price_at_alert,
            alert.reference_price,
            alert.deviation_pct,
            alert.message,
        ],
    )?;
    Ok(AlertRecord {
        id: conn.last_insert_rowid(),
        timestamp,
        symbol: alert.symbol.clone(),
        kind: alert.kind,
        price_at_alert: alert.price_at_alert,
        reference_price: alert.reference_price,
        deviation_pct: alert.deviation_pct,
        message: alert.message.clone(),
        read: false,
    })
}

/// Alerts newest-first, optionally filtered by symbol and/or unread.
pub fn list_alerts(
    conn: &Connection,
    symbol: Option<&str>,
    unread_only: bool,
) -> Result<Vec<AlertRecord>, CoreError> {
    let mut sql = String::from(
        "SELECT id, timestamp, symbol, kind, price_at_alert, reference_price,
                deviation_pct, message, read_flag
         FROM alerts",
    );
    let mut clauses: Vec<&str> = Vec::new();
    if symbol.is_some() {
        clauses.push("symbol = ?1");
    }
    if unread_only {
        clauses.push("read_flag = 0");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY timestamp DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut alerts = Vec::new();
    match symbol {
        Some(symbol) => {
            let rows = stmt.query_map([symbol], map_alert)?;
            for row in rows {
                alerts.push(row?);
            }
        }
        None => {
            let rows = stmt.query_map([], map_alert)?;
            for row in rows {
                alerts.push(row?);
            }
        }
    }
    Ok(alerts)
}

/// Most recent alert of a given kind for a symbol — the cooldown anchor.
pub fn latest_alert(
    conn: &Connection,
    symbol: &str,
    kind: AlertKind,
) -> Result<Option<AlertRecord>, CoreError> {
    let alert = conn
        .query_row(
            "SELECT id, timestamp, symbol, kind, price_at_alert, reference_price,
                    deviation_pct, message, read_flag
             FROM alerts WHERE symbol = ?1 AND kind = ?2
             ORDER BY timestamp DESC, id DESC LIMIT 1",
            params![symbol, kind.as_str()],
            map_alert,
        )
        .optional()?;
    Ok(alert)
}

/// Flip the read flag on one alert. Errors if the id does not exist.
pub fn mark_alert_read(conn: &Connection, id: i64) -> Result<(), CoreError> {
    let updated = conn.execute("UPDATE alerts SET read_flag = 1 WHERE id = ?1", [id])?;
    if updated == 0 {
        return Err(CoreError::AlertNotFound(id));
    }
    Ok(())
}

/// Aggregate counters over the whole alert log (or one symbol's slice).
pub fn alert_stats(conn: &Connection, symbol: Option<&str>) -> Result<AlertStats, CoreError> {
    let alerts = list_alerts(conn, symbol, false)?;
    let unread = alerts.iter().filter(|a| !a.read).count();
    let last_alert = alerts.first().map(|a| a.timestamp);
    Ok(AlertStats {
        total: alerts.len(),
        unread,
        last_alert,
    })
}

fn map_alert(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRecord> {
    let timestamp_str: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
    let kind_str: String = row.get(3)?;
    let kind = AlertKind::parse(&kind_str).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("bad alert kind: {kind_str}"),
            )),
        )
    })?;
    Ok(AlertRecord {
        id: row.get(0)?,
        timestamp,
        symbol: row.get(2)?,
        kind,
        price_at_alert: row.get(4)?,
        reference_price: row.get(5)?,
        deviation_pct: row.get(6)?,
        message: row.get(7)?,
        read: row.get::<_, i64>(8)? != 0,
    })
}
