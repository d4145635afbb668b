use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Category of a tracked asset, matching the `assets.category` CHECK list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    /// Listed equity (AAPL, MSFT, ...)
    Equity,
    /// Cryptocurrency (BTC-USD, ETH-USD, ...)
    Crypto,
    /// Exchange-traded fund
    Etf,
    /// Fixed-income instrument (bonds, treasury bills)
    FixedIncome,
    /// Other variable-yield instrument
    OtherVariable,
    /// Other fixed-yield instrument
    OtherFixed,
}

impl AssetCategory {
    /// Stable string form used in the database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Equity => "equity",
            AssetCategory::Crypto => "crypto",
            AssetCategory::Etf => "etf",
            AssetCategory::FixedIncome => "fixed_income",
            AssetCategory::OtherVariable => "other_variable",
            AssetCategory::OtherFixed => "other_fixed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "equity" => Ok(AssetCategory::Equity),
            "crypto" => Ok(AssetCategory::Crypto),
            "etf" => Ok(AssetCategory::Etf),
            "fixed_income" => Ok(AssetCategory::FixedIncome),
            "other_variable" => Ok(AssetCategory::OtherVariable),
            "other_fixed" => Ok(AssetCategory::OtherFixed),
            other => Err(CoreError::Validation(format!(
                "Unknown asset category '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trackable asset. Created lazily the first time a transaction
/// references its symbol.
///
/// **Equality and hashing** are based solely on `symbol`, not on the
/// display name — symbols are the unique key in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol, uppercased (e.g., "AAPL", "BTC-USD")
    pub symbol: String,

    /// Human-readable name (e.g., "Apple Inc."); defaults to the symbol
    pub name: String,

    /// Asset category
    pub category: AssetCategory,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        category: AssetCategory,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            category,
        }
    }
}

/// Normalize a ticker to its canonical uppercase form.
/// Rejects empty or whitespace-only input.
pub fn normalize_symbol(symbol: &str) -> Result<String, CoreError> {
    let upper = symbol.trim().to_uppercase();
    if upper.is_empty() {
        return Err(CoreError::Validation("Symbol must not be empty".into()));
    }
    Ok(upper)
}
