use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::asset::normalize_symbol;

/// A recorded buy transaction, as read back from the store.
///
/// Transactions are immutable once written — the log is append-only and
/// holdings are always recomputed from it, never mutated in place.
/// All prices are in USD, the currency of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-generated row id
    pub id: i64,

    /// Trade date (daily granularity)
    pub date: NaiveDate,

    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Unit price in USD, strictly positive
    pub price: f64,

    /// Units traded; positive = buy
    pub quantity: f64,

    /// Broker commission in USD, non-negative
    pub commission: f64,
}

/// Input for recording a new transaction. Validated before it reaches
/// the store so a rejected write leaves no partial state behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub symbol: String,
    pub price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub commission: f64,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, symbol: impl Into<String>, price: f64, quantity: f64) -> Self {
        Self {
            date,
            symbol: symbol.into(),
            price,
            quantity,
            commission: 0.0,
        }
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = commission;
        self
    }

    /// Check all field invariants and return the normalized symbol.
    pub fn validate(&self) -> Result<String, CoreError> {
        let symbol = normalize_symbol(&self.symbol)?;
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Price must be a positive number, got {}",
                self.price
            )));
        }
        if !self.quantity.is_finite() || self.quantity == 0.0 {
            return Err(CoreError::Validation(format!(
                "Quantity must be a non-zero number, got {}",
                self.quantity
            )));
        }
        if !self.commission.is_finite() || self.commission < 0.0 {
            return Err(CoreError::Validation(format!(
                "Commission must be non-negative, got {}",
                self.commission
            )));
        }
        Ok(symbol)
    }
}
