use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::{Candle, HistoryPeriod};
use crate::models::settings::Currency;
use crate::providers::traits::MarketDataProvider;

/// How long a fetched quote (or FX rate) is reused before refetching.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Exchange rate used when the upstream FX fetch fails. Valuation stays
/// available at a stale-but-plausible rate instead of erroring out.
pub const DEFAULT_USD_MXN_RATE: f64 = 17.0;

/// Yahoo symbol for the USD→MXN exchange rate.
const USD_MXN_PAIR: &str = "USDMXN=X";

/// Minimum spacing between requests in batch fetches, to respect
/// upstream quotas.
const REQUEST_SPACING: Duration = Duration::from_millis(200);

/// Per-symbol timeout on upstream fetches so one hung request cannot
/// stall a batch. Shared with the alert evaluator.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One cached USD quote.
struct CachedQuote {
    price: f64,
    fetched_at: Instant,
}

/// Fetches asset prices from the market-data provider with TTL caching.
///
/// Cache strategy (all in process memory, keyed by uppercase symbol):
/// - A quote fetched less than `CACHE_TTL` ago is reused verbatim.
/// - A stale or missing quote is refetched and the entry replaced.
/// - The USD→MXN rate uses the same TTL; on upstream failure it degrades
///   to `DEFAULT_USD_MXN_RATE` rather than failing the caller.
///
/// All quotes are stored in USD. MXN is applied at read time.
pub struct PriceService {
    provider: Box<dyn MarketDataProvider>,
    quotes: Mutex<HashMap<String, CachedQuote>>,
    fx_cache: Mutex<Option<CachedQuote>>,
}

impl PriceService {
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            quotes: Mutex::new(HashMap::new()),
            fx_cache: Mutex::new(None),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current price of a symbol in the requested display currency.
    ///
    /// Returns `PriceNotAvailable` when the upstream fetch fails and no
    /// fresh cache entry exists; the caller decides how to degrade.
    pub async fn current_price(
        &self,
        symbol: &str,
        currency: Currency,
    ) -> Result<f64, CoreError> {
        let usd = self.current_price_usd(symbol).await?;
        match currency {
            Currency::Usd => Ok(usd),
            Currency::Mxn => Ok(usd * self.usd_mxn_rate().await),
        }
    }

    /// Current USD price, cache-first.
    pub async fn current_price_usd(&self, symbol: &str) -> Result<f64, CoreError> {
        let upper = symbol.to_uppercase();

        if let Some(price) = self.cached_quote(&upper) {
            return Ok(price);
        }

        let price = self.provider.current_price(&upper).await.map_err(|e| {
            debug!(symbol = %upper, error = %e, "current price fetch failed");
            CoreError::PriceNotAvailable {
                symbol: upper.clone(),
            }
        })?;

        let mut quotes = self.quotes.lock().unwrap_or_else(|e| e.into_inner());
        quotes.insert(
            upper,
            CachedQuote {
                price,
                fetched_at: Instant::now(),
            },
        );

        Ok(price)
    }

    /// Current prices for many symbols in the requested currency.
    ///
    /// Symbols are fetched sequentially with `REQUEST_SPACING` between
    /// requests and a `FETCH_TIMEOUT` per symbol. A symbol whose fetch
    /// fails or times out is logged and omitted — it never aborts the
    /// batch.
    pub async fn multiple_prices(
        &self,
        symbols: &[String],
        currency: Currency,
    ) -> HashMap<String, f64> {
        let fx = match currency {
            Currency::Usd => 1.0,
            Currency::Mxn => self.usd_mxn_rate().await,
        };

        let mut prices = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(REQUEST_SPACING).await;
            }
            match tokio::time::timeout(FETCH_TIMEOUT, self.current_price_usd(symbol)).await {
                Ok(Ok(usd)) => {
                    prices.insert(symbol.to_uppercase(), usd * fx);
                }
                Ok(Err(e)) => {
                    warn!(symbol = %symbol, error = %e, "skipping symbol in batch price fetch");
                }
                Err(_) => {
                    let err = CoreError::FetchTimeout {
                        symbol: symbol.to_uppercase(),
                        seconds: FETCH_TIMEOUT.as_secs(),
                    };
                    warn!(error = %err, "skipping symbol in batch price fetch");
                }
            }
        }
        prices
    }

    /// Daily close history for a symbol, oldest first.
    /// An empty upstream response maps to `HistoryNotAvailable`.
    pub async fn history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<Candle>, CoreError> {
        let upper = symbol.to_uppercase();
        let candles = self.provider.history(&upper, period).await?;
        if candles.is_empty() {
            return Err(CoreError::HistoryNotAvailable {
                symbol: upper,
                period: period.to_string(),
            });
        }
        debug!(symbol = %upper, samples = candles.len(), "fetched history");
        Ok(candles)
    }

    /// USD→MXN exchange rate, cache-first, falling back to
    /// `DEFAULT_USD_MXN_RATE` when the upstream fetch fails.
    pub async fn usd_mxn_rate(&self) -> f64 {
        {
            let cache = self.fx_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < CACHE_TTL {
                    return cached.price;
                }
            }
        }

        match self.provider.fx_rate(USD_MXN_PAIR).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                let mut cache = self.fx_cache.lock().unwrap_or_else(|e| e.into_inner());
                *cache = Some(CachedQuote {
                    price: rate,
                    fetched_at: Instant::now(),
                });
                rate
            }
            Ok(rate) => {
                warn!(rate, "upstream returned invalid USD/MXN rate, using default");
                DEFAULT_USD_MXN_RATE
            }
            Err(e) => {
                warn!(error = %e, "USD/MXN fetch failed, using default rate");
                DEFAULT_USD_MXN_RATE
            }
        }
    }

    /// Whether the upstream source recognizes this symbol.
    pub async fn validate_symbol(&self, symbol: &str) -> Result<bool, CoreError> {
        self.provider.validate_symbol(&symbol.to_uppercase()).await
    }

    /// Drop all cached quotes and the FX rate, forcing refetches.
    pub fn clear_cache(&self) {
        self.quotes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        *self.fx_cache.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn cached_quote(&self, symbol: &str) -> Option<f64> {
        let quotes = self.quotes.lock().unwrap_or_else(|e| e.into_inner());
        quotes
            .get(symbol)
            .filter(|q| q.fetched_at.elapsed() < CACHE_TTL)
            .map(|q| q.price)
    }
}
