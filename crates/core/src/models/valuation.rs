use serde::{Deserialize, Serialize};

use super::settings::Currency;

/// Valuation of one holding, in the snapshot's display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,

    /// Weighted average purchase price, converted to the display currency
    pub avg_price: f64,

    /// Capital invested, converted to the display currency
    pub total_invested: f64,

    /// Live price in the display currency, or the avg-price fallback
    pub current_price: f64,

    /// quantity × current_price
    pub current_value: f64,

    /// (current_price − avg_price) / avg_price × 100; 0 when avg_price is 0
    pub return_pct: f64,

    /// True when the live fetch failed and `current_price` is the
    /// converted average price instead of a market quote.
    pub price_is_fallback: bool,
}

/// Point-in-time valuation of the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub currency: Currency,

    /// Per-symbol rows, ordered by symbol
    pub rows: Vec<ValuationRow>,

    pub total_invested: f64,
    pub total_value: f64,

    /// total_value − total_invested
    pub profit: f64,

    /// profit / total_invested × 100; 0 when nothing is invested
    pub profit_pct: f64,

    /// Symbol with the highest per-asset return percentage
    pub best_performer: Option<String>,

    /// Symbol with the lowest per-asset return percentage
    pub worst_performer: Option<String>,
}
