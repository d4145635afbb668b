use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::{Candle, HistoryPeriod};

/// Trait abstraction over the upstream market-data source.
///
/// The one production implementation talks to Yahoo Finance; tests inject
/// fakes. All prices returned here are in USD — currency conversion is
/// the PriceService's job, not the provider's.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest traded price for a symbol, in USD.
    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Daily OHLCV history over a lookback period, oldest first.
    /// May legitimately be empty for thinly traded symbols.
    async fn history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<Candle>, CoreError>;

    /// Latest quote for an FX pair symbol (e.g., "USDMXN=X").
    async fn fx_rate(&self, pair: &str) -> Result<f64, CoreError>;

    /// Whether the upstream source recognizes this symbol.
    async fn validate_symbol(&self, symbol: &str) -> Result<bool, CoreError>;
}
