pub mod errors;
pub mod forecast;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use errors::CoreError;
use models::{
    alert::{AlertRecord, AlertStats},
    asset::{normalize_symbol, Asset, AssetCategory},
    forecast::{Forecast, ForecastKind},
    holding::Holding,
    price::{Candle, HistoryPeriod},
    settings::Currency,
    transaction::{NewTransaction, Transaction},
    valuation::PortfolioSnapshot,
};
use providers::traits::MarketDataProvider;
use providers::yahoo::YahooFinanceProvider;
use services::{
    alert_service::{AlertEvaluator, AlertOutcome},
    confidence_band::ConfidenceBandCalculator,
    portfolio_service::PortfolioAggregator,
    price_service::PriceService,
};
use store::Database;

/// How often the alert monitor re-checks the portfolio.
pub const ALERT_CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Main entry point for the portfolio tracker core library.
///
/// Owns one instance of every component and passes them explicitly —
/// no global singletons. Construct once, share by reference.
#[must_use]
pub struct PortfolioTracker {
    db: Database,
    prices: PriceService,
    aggregator: PortfolioAggregator,
    alerts: AlertEvaluator,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("provider", &self.prices.provider_name())
            .finish()
    }
}

impl PortfolioTracker {
    /// Open (creating if needed) the database file and wire up the
    /// default Yahoo Finance provider.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let db = Database::open(path.as_ref())?;
        let provider = YahooFinanceProvider::new()?;
        Ok(Self::with_provider(db, Box::new(provider)))
    }

    /// In-memory database with the default provider. Nothing persists
    /// past the process.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let db = Database::open_in_memory()?;
        let provider = YahooFinanceProvider::new()?;
        Ok(Self::with_provider(db, Box::new(provider)))
    }

    /// Wire an explicit provider — the injection point for tests and
    /// alternative data sources.
    pub fn with_provider(db: Database, provider: Box<dyn MarketDataProvider>) -> Self {
        Self {
            db,
            prices: PriceService::new(provider),
            aggregator: PortfolioAggregator::new(),
            alerts: AlertEvaluator::new(ConfidenceBandCalculator::default()),
        }
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Validate and append a buy transaction. The asset is registered
    /// lazily if the symbol is new.
    pub fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction, CoreError> {
        let recorded = self.db.record_transaction(&tx)?;
        info!(
            symbol = %recorded.symbol,
            quantity = recorded.quantity,
            price = recorded.price,
            "transaction recorded"
        );
        Ok(recorded)
    }

    /// All transactions (oldest first), optionally for one symbol.
    pub fn get_transactions(&self, symbol: Option<&str>) -> Result<Vec<Transaction>, CoreError> {
        self.db.transactions(symbol)
    }

    /// Register an asset with an explicit display name and category.
    pub fn register_asset(
        &self,
        symbol: &str,
        name: &str,
        category: AssetCategory,
    ) -> Result<(), CoreError> {
        let upper = normalize_symbol(symbol)?;
        self.db.register_asset(&upper, name, category)
    }

    pub fn get_assets(&self) -> Result<Vec<Asset>, CoreError> {
        self.db.list_assets()
    }

    // ── Holdings & Valuation ────────────────────────────────────────

    /// Current holdings in USD, recomputed from the transaction log.
    pub fn get_holdings(&self) -> Result<Vec<Holding>, CoreError> {
        self.aggregator.holdings(&self.db)
    }

    /// Valuation snapshot in the persisted display currency.
    pub async fn snapshot(&self) -> Result<PortfolioSnapshot, CoreError> {
        let currency = self.db.display_currency()?;
        self.snapshot_in(currency).await
    }

    /// Valuation snapshot in an explicit currency.
    pub async fn snapshot_in(&self, currency: Currency) -> Result<PortfolioSnapshot, CoreError> {
        self.aggregator.snapshot(&self.db, &self.prices, currency).await
    }

    // ── Alerts ──────────────────────────────────────────────────────

    /// Run the confidence-band check for one symbol.
    pub async fn evaluate_alert(&self, symbol: &str) -> Result<AlertOutcome, CoreError> {
        self.alerts.evaluate(&self.db, &self.prices, symbol).await
    }

    /// Run the check across every symbol currently in the transaction
    /// log. Per-symbol failures are logged and skipped.
    pub async fn check_portfolio_alerts(&self) -> Result<Vec<AlertRecord>, CoreError> {
        let symbols = self.db.symbols()?;
        Ok(self
            .alerts
            .evaluate_portfolio(&self.db, &self.prices, &symbols)
            .await)
    }

    /// Periodic driver: re-check the portfolio every `interval`,
    /// forever. Spawn it next to the interactive surface.
    pub async fn run_alert_monitor(&self, interval: Duration) {
        loop {
            match self.check_portfolio_alerts().await {
                Ok(triggered) if !triggered.is_empty() => {
                    info!(count = triggered.len(), "periodic check stored alerts");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "periodic alert check failed"),
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Stored alerts, newest first.
    pub fn get_alerts(
        &self,
        symbol: Option<&str>,
        unread_only: bool,
    ) -> Result<Vec<AlertRecord>, CoreError> {
        self.db.alerts(symbol, unread_only)
    }

    pub fn mark_alert_read(&self, id: i64) -> Result<(), CoreError> {
        self.db.mark_alert_read(id)
    }

    pub fn get_alert_stats(&self, symbol: Option<&str>) -> Result<AlertStats, CoreError> {
        self.db.alert_stats(symbol)
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Live price in the persisted display currency.
    pub async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let currency = self.db.display_currency()?;
        self.prices.current_price(symbol, currency).await
    }

    /// Daily close history, oldest first.
    pub async fn get_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<Candle>, CoreError> {
        self.prices.history(symbol, period).await
    }

    /// Whether the upstream source recognizes this symbol.
    pub async fn validate_symbol(&self, symbol: &str) -> Result<bool, CoreError> {
        self.prices.validate_symbol(symbol).await
    }

    /// Drop all cached quotes, forcing fresh fetches.
    pub fn clear_price_cache(&self) {
        self.prices.clear_cache();
    }

    // ── Forecasting ─────────────────────────────────────────────────

    /// Fit the named strategy to six months of history and predict
    /// `steps` days ahead.
    pub async fn forecast(
        &self,
        symbol: &str,
        kind: ForecastKind,
        steps: usize,
    ) -> Result<Forecast, CoreError> {
        let candles = self
            .prices
            .history(symbol, HistoryPeriod::SixMonths)
            .await?;
        forecast::run_forecast(kind, &candles, steps)
    }

    // ── Settings ────────────────────────────────────────────────────

    pub fn display_currency(&self) -> Result<Currency, CoreError> {
        self.db.display_currency()
    }

    pub fn set_display_currency(&self, currency: Currency) -> Result<(), CoreError> {
        self.db.set_display_currency(currency)
    }
}
