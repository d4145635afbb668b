use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Persistence ─────────────────────────────────────────────────
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Current price not available for {symbol}")]
    PriceNotAvailable { symbol: String },

    #[error("No historical data available for {symbol} over {period}")]
    HistoryNotAvailable { symbol: String, period: String },

    #[error("Price fetch for {symbol} timed out after {seconds}s")]
    FetchTimeout { symbol: String, seconds: u64 },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(i64),

    #[error("Unknown forecast model: {0}")]
    UnknownModel(String),
}
