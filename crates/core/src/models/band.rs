use serde::{Deserialize, Serialize};

/// One point of the rolling confidence envelope. Produced per index by
/// the calculator; `None` wherever fewer than `window` samples precede.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub moving_average: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// The trailing confidence band for a symbol, as used by the alert check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    /// Number of trailing closes the band was computed over
    pub window: usize,

    /// Two-sided confidence level, e.g. 0.90
    pub confidence: f64,

    pub moving_average: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}
