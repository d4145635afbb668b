use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::alert::{AlertKind, AlertRecord, NewAlert};
use crate::models::band::ConfidenceBand;
use crate::models::price::HistoryPeriod;
use crate::services::confidence_band::ConfidenceBandCalculator;
use crate::services::price_service::{PriceService, FETCH_TIMEOUT};
use crate::store::Database;

/// Minimum seconds between two stored alerts of the same kind for the
/// same symbol.
pub const ALERT_COOLDOWN_SECS: i64 = 3600;

/// The overbought trigger sits 5% above the lower band.
const UPPER_THRESHOLD_FACTOR: f64 = 1.05;

/// Lookback used for the band computation.
const ALERT_HISTORY_PERIOD: HistoryPeriod = HistoryPeriod::SixMonths;

/// Outcome of one alert evaluation. Suppression and missing data are
/// ordinary outcomes, not errors — only fetch/store failures error out.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// A new alert was stored and should be surfaced to the user.
    Triggered(AlertRecord),

    /// Price sits inside the band; nothing to report.
    NoCondition,

    /// A qualifying condition exists but the same (symbol, kind) alerted
    /// within the cooldown window. Nothing stored.
    Suppressed {
        kind: AlertKind,
        seconds_since_last: i64,
    },

    /// Fewer closes than the band window; the band is undefined.
    InsufficientHistory { samples: usize, window: usize },
}

/// Evaluates confidence-band alert conditions per symbol and persists
/// qualifying alerts, deduplicated through the cooldown window.
///
/// Cooldown check and insert run under one async lock so an overlapping
/// periodic check and a manual refresh cannot both store the same alert.
pub struct AlertEvaluator {
    calculator: ConfidenceBandCalculator,
    write_lock: Mutex<()>,
}

impl AlertEvaluator {
    pub fn new(calculator: ConfidenceBandCalculator) -> Self {
        Self {
            calculator,
            write_lock: Mutex::new(()),
        }
    }

    /// Evaluate one symbol end to end: history → band → live price →
    /// classification → cooldown → store. Both upstream fetches carry a
    /// `FETCH_TIMEOUT` bound so a hung request surfaces as `FetchTimeout`
    /// instead of stalling the caller.
    pub async fn evaluate(
        &self,
        db: &Database,
        prices: &PriceService,
        symbol: &str,
    ) -> Result<AlertOutcome, CoreError> {
        let upper_symbol = symbol.to_uppercase();

        let candles = bounded(
            &upper_symbol,
            prices.history(&upper_symbol, ALERT_HISTORY_PERIOD),
        )
        .await?;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let band = match self.calculator.latest(&closes) {
            Some(band) => band,
            None => {
                debug!(
                    symbol = %upper_symbol,
                    samples = closes.len(),
                    window = self.calculator.window(),
                    "not enough history for a band"
                );
                return Ok(AlertOutcome::InsufficientHistory {
                    samples: closes.len(),
                    window: self.calculator.window(),
                });
            }
        };

        let current_price =
            bounded(&upper_symbol, prices.current_price_usd(&upper_symbol)).await?;

        let candidate = match classify(&upper_symbol, current_price, &band) {
            Some(c) => c,
            None => return Ok(AlertOutcome::NoCondition),
        };

        // Cooldown check and insert are one critical section: two
        // concurrent evaluations of the same condition must resolve to a
        // single stored alert.
        let _guard = self.write_lock.lock().await;

        if let Some(previous) = db.latest_alert(&upper_symbol, candidate.kind)? {
            let elapsed = (Utc::now() - previous.timestamp).num_seconds();
            if within_cooldown(elapsed) {
                debug!(
                    symbol = %upper_symbol,
                    kind = %candidate.kind,
                    elapsed,
                    "alert suppressed by cooldown"
                );
                return Ok(AlertOutcome::Suppressed {
                    kind: candidate.kind,
                    seconds_since_last: elapsed,
                });
            }
        }

        let record = db.insert_alert(&candidate)?;
        info!(symbol = %upper_symbol, kind = %record.kind, message = %record.message, "alert stored");
        Ok(AlertOutcome::Triggered(record))
    }

    /// Evaluate every symbol in the list. Symbols are independent: a
    /// failed or timed-out fetch is logged and skipped, never aborting
    /// the batch. Returns the alerts that were stored.
    pub async fn evaluate_portfolio(
        &self,
        db: &Database,
        prices: &PriceService,
        symbols: &[String],
    ) -> Vec<AlertRecord> {
        let mut triggered = Vec::new();
        for symbol in symbols {
            match self.evaluate(db, prices, symbol).await {
                Ok(AlertOutcome::Triggered(record)) => triggered.push(record),
                Ok(_) => {}
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "alert evaluation failed, skipping symbol");
                }
            }
        }
        triggered
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(ConfidenceBandCalculator::default())
    }
}

/// Whether an alert stored `elapsed_secs` ago still suppresses a new one
/// of the same kind. The window is inclusive: an alert aged exactly one
/// cooldown still suppresses.
pub fn within_cooldown(elapsed_secs: i64) -> bool {
    elapsed_secs <= ALERT_COOLDOWN_SECS
}

/// Run a provider-bound future with the shared per-symbol timeout,
/// mapping expiry to `FetchTimeout` for the given symbol.
async fn bounded<T>(
    symbol: &str,
    fut: impl std::future::Future<Output = Result<T, CoreError>>,
) -> Result<T, CoreError> {
    match tokio::time::timeout(FETCH_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(CoreError::FetchTimeout {
            symbol: symbol.to_string(),
            seconds: FETCH_TIMEOUT.as_secs(),
        }),
    }
}

/// Classify a live price against the band. `None` means the price sits
/// between the lower band and the upper threshold. Stored deviation is
/// always the distance from the threshold that fired, for both kinds.
pub fn classify(symbol: &str, current_price: f64, band: &ConfidenceBand) -> Option<NewAlert> {
    let lower = band.lower_bound;
    if lower <= 0.0 {
        return None;
    }
    let upper_threshold = lower * UPPER_THRESHOLD_FACTOR;

    if current_price < lower {
        let deviation_pct = (lower - current_price) / lower * 100.0;
        Some(NewAlert {
            symbol: symbol.to_string(),
            kind: AlertKind::BuyOpportunity,
            price_at_alert: current_price,
            reference_price: lower,
            deviation_pct,
            message: format!(
                "{symbol} is {deviation_pct:.1}% below the lower confidence band"
            ),
        })
    } else if current_price > upper_threshold {
        let deviation_pct = (current_price - upper_threshold) / upper_threshold * 100.0;
        Some(NewAlert {
            symbol: symbol.to_string(),
            kind: AlertKind::Overbought,
            price_at_alert: current_price,
            reference_price: lower,
            deviation_pct,
            message: format!(
                "{symbol} is {deviation_pct:.1}% above the upper threshold"
            ),
        })
    } else {
        None
    }
}
