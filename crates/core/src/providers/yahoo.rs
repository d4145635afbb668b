use async_trait::async_trait;
use chrono::NaiveDate;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::price::{Candle, HistoryPeriod};

/// Yahoo Finance market-data provider.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, crypto pairs, FX pairs.
/// - **Data**: Real-time quotes + daily OHLCV history.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's public
/// endpoints. Quotes come back in the instrument's native currency
/// (USD for everything this tracker records); FX pairs like "USDMXN=X"
/// are ordinary quote symbols.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        if !quote.close.is_finite() || quote.close <= 0.0 {
            return Err(CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
            });
        }

        Ok(quote.close)
    }

    async fn history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<Candle>, CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", period.as_range())
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch {period} history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let mut candles: Vec<Candle> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                Some(Candle {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        candles.sort_by_key(|c| c.date);
        Ok(candles)
    }

    async fn fx_rate(&self, pair: &str) -> Result<f64, CoreError> {
        // FX pairs are plain quote symbols upstream
        self.current_price(pair).await
    }

    async fn validate_symbol(&self, symbol: &str) -> Result<bool, CoreError> {
        let result = self
            .connector
            .search_ticker(symbol)
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Symbol search failed for {symbol}: {e}"),
            })?;

        let upper = symbol.to_uppercase();
        Ok(result.quotes.iter().any(|q| q.symbol.to_uppercase() == upper))
    }
}
