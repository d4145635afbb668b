use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// The two alert conditions raised by the confidence-band check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Current price closed below the lower confidence band
    BuyOpportunity,
    /// Current price closed above the upper threshold (lower band × 1.05)
    Overbought,
}

impl AlertKind {
    /// Stable string form used in the `alerts.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::BuyOpportunity => "buy_opportunity",
            AlertKind::Overbought => "overbought",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "buy_opportunity" => Ok(AlertKind::BuyOpportunity),
            "overbought" => Ok(AlertKind::Overbought),
            other => Err(CoreError::Validation(format!(
                "Unknown alert kind '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted alert. Append-only: alerts are never deleted, the only
/// permitted mutation is flipping the read flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub kind: AlertKind,

    /// Live price at the moment the alert fired, USD
    pub price_at_alert: f64,

    /// Lower confidence band at the moment the alert fired, USD
    pub reference_price: f64,

    /// Percentage distance from the trigger threshold
    pub deviation_pct: f64,

    pub message: String,
    pub read: bool,
}

/// Input for inserting a new alert row.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub symbol: String,
    pub kind: AlertKind,
    pub price_at_alert: f64,
    pub reference_price: f64,
    pub deviation_pct: f64,
    pub message: String,
}

/// Aggregate counters over the alert log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: usize,
    pub unread: usize,
    pub last_alert: Option<DateTime<Utc>>,
}
