use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::transaction::Transaction;

/// A derived position in one symbol. Never stored — always recomputed
/// from the full transaction log on query, so there is no incremental
/// state to drift out of sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,

    /// Σ quantity over all transactions for this symbol
    pub total_quantity: f64,

    /// Σ(price·quantity) / Σ quantity, in USD
    pub weighted_avg_price: f64,

    /// Σ(price·quantity), in USD
    pub total_invested: f64,
}

impl Holding {
    /// Fold a transaction log into per-symbol holdings.
    ///
    /// Positions with total quantity ≤ 0 are filtered out — a fully sold
    /// position simply disappears. Results are ordered by symbol.
    pub fn from_transactions(transactions: &[Transaction]) -> Vec<Holding> {
        let mut by_symbol: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

        for tx in transactions {
            let entry = by_symbol.entry(tx.symbol.as_str()).or_insert((0.0, 0.0));
            entry.0 += tx.quantity;
            entry.1 += tx.price * tx.quantity;
        }

        by_symbol
            .into_iter()
            .filter(|(_, (quantity, _))| *quantity > f64::EPSILON)
            .map(|(symbol, (quantity, invested))| Holding {
                symbol: symbol.to_string(),
                total_quantity: quantity,
                weighted_avg_price: invested / quantity,
                total_invested: invested,
            })
            .collect()
    }
}
