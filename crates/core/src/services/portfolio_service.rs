use std::collections::HashMap;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::settings::Currency;
use crate::models::valuation::{PortfolioSnapshot, ValuationRow};
use crate::store::Database;

use super::price_service::PriceService;

/// Folds the transaction log into holdings and merges them with live
/// prices into a point-in-time valuation.
///
/// Pure aggregation plus one batch price fetch — no other I/O. Holdings
/// are recomputed from the full log on every snapshot; nothing is
/// mutated incrementally.
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Current holdings: per-symbol quantity, weighted average cost and
    /// invested capital, in USD. Fully sold positions are absent.
    pub fn holdings(&self, db: &Database) -> Result<Vec<Holding>, CoreError> {
        let transactions = db.transactions(None)?;
        Ok(Holding::from_transactions(&transactions))
    }

    /// Valuation of every holding in the requested currency.
    ///
    /// A symbol whose live price cannot be fetched still appears: its
    /// `current_price` degrades to the weighted average price converted
    /// to the same currency, and the row is marked as a fallback. One
    /// symbol's failure never aborts the snapshot.
    pub async fn snapshot(
        &self,
        db: &Database,
        prices: &PriceService,
        currency: Currency,
    ) -> Result<PortfolioSnapshot, CoreError> {
        let holdings = self.holdings(db)?;

        let symbols: Vec<String> = holdings.iter().map(|h| h.symbol.clone()).collect();
        let live: HashMap<String, f64> = prices.multiple_prices(&symbols, currency).await;

        // Stored figures are USD; one rate converts everything so a
        // snapshot is internally consistent.
        let fx = match currency {
            Currency::Usd => 1.0,
            Currency::Mxn => prices.usd_mxn_rate().await,
        };

        let mut rows = Vec::with_capacity(holdings.len());
        for holding in &holdings {
            let avg_price = holding.weighted_avg_price * fx;
            let total_invested = holding.total_invested * fx;

            let (current_price, price_is_fallback) = match live.get(&holding.symbol) {
                Some(price) => (*price, false),
                None => (avg_price, true),
            };

            let current_value = holding.total_quantity * current_price;
            let return_pct = if avg_price > 0.0 {
                (current_price - avg_price) / avg_price * 100.0
            } else {
                0.0
            };

            let name = db
                .get_asset(&holding.symbol)?
                .map(|a| a.name)
                .unwrap_or_else(|| holding.symbol.clone());

            rows.push(ValuationRow {
                symbol: holding.symbol.clone(),
                name,
                quantity: holding.total_quantity,
                avg_price,
                total_invested,
                current_price,
                current_value,
                return_pct,
                price_is_fallback,
            });
        }

        let total_invested: f64 = rows.iter().map(|r| r.total_invested).sum();
        let total_value: f64 = rows.iter().map(|r| r.current_value).sum();
        let profit = total_value - total_invested;
        let profit_pct = if total_invested > 0.0 {
            profit / total_invested * 100.0
        } else {
            0.0
        };

        let best_performer = rows
            .iter()
            .max_by(|a, b| {
                a.return_pct
                    .partial_cmp(&b.return_pct)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|r| r.symbol.clone());
        let worst_performer = rows
            .iter()
            .min_by(|a, b| {
                a.return_pct
                    .partial_cmp(&b.return_pct)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|r| r.symbol.clone());

        debug!(
            currency = %currency,
            holdings = rows.len(),
            total_value,
            "portfolio snapshot computed"
        );

        Ok(PortfolioSnapshot {
            currency,
            rows,
            total_invested,
            total_value,
            profit,
            profit_pct,
            best_performer,
            worst_performer,
        })
    }
}

impl Default for PortfolioAggregator {
    fn default() -> Self {
        Self::new()
    }
}
