use statrs::distribution::{ContinuousCDF, Normal};

use crate::models::band::{BandPoint, ConfidenceBand};

/// Default rolling window, in daily closes.
pub const DEFAULT_WINDOW: usize = 60;

/// Default two-sided confidence level.
pub const DEFAULT_CONFIDENCE: f64 = 0.90;

/// Computes a rolling confidence envelope over a close-price series.
///
/// For each index with at least `window` samples behind it (inclusive):
/// mean and sample standard deviation over the trailing window, then
/// band = mean ± z·std/√window where z = Φ⁻¹((1+confidence)/2).
/// A flat series has zero std, so both bounds collapse onto the mean.
///
/// Pure computation — no I/O. Only the trailing point feeds the alert
/// check; the full series feeds charting.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceBandCalculator {
    window: usize,
    confidence: f64,
    z_score: f64,
}

impl ConfidenceBandCalculator {
    /// Window must be ≥ 2 (sample std needs two points), confidence
    /// strictly inside (0, 1). Falls back to the defaults otherwise.
    pub fn new(window: usize, confidence: f64) -> Self {
        let window = if window >= 2 { window } else { DEFAULT_WINDOW };
        let confidence = if confidence > 0.0 && confidence < 1.0 {
            confidence
        } else {
            DEFAULT_CONFIDENCE
        };
        Self {
            window,
            confidence,
            z_score: two_sided_z(confidence),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Band per index. The first `window - 1` entries are `None` — the
    /// band is undefined until a full window of samples precedes it.
    pub fn series_bands(&self, closes: &[f64]) -> Vec<Option<BandPoint>> {
        let mut bands = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            if i + 1 < self.window {
                bands.push(None);
                continue;
            }
            let window_slice = &closes[i + 1 - self.window..=i];
            bands.push(Some(self.band_over(window_slice)));
        }
        bands
    }

    /// The trailing band, or `None` when the series is shorter than the
    /// window.
    pub fn latest(&self, closes: &[f64]) -> Option<ConfidenceBand> {
        if closes.len() < self.window {
            return None;
        }
        let point = self.band_over(&closes[closes.len() - self.window..]);
        Some(ConfidenceBand {
            window: self.window,
            confidence: self.confidence,
            moving_average: point.moving_average,
            lower_bound: point.lower_bound,
            upper_bound: point.upper_bound,
        })
    }

    fn band_over(&self, window_slice: &[f64]) -> BandPoint {
        let n = window_slice.len() as f64;
        let mean = window_slice.iter().sum::<f64>() / n;
        let variance = window_slice
            .iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        let std = variance.sqrt();
        let margin = self.z_score * (std / n.sqrt());
        BandPoint {
            moving_average: mean,
            lower_bound: mean - margin,
            upper_bound: mean + margin,
        }
    }
}

impl Default for ConfidenceBandCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_CONFIDENCE)
    }
}

/// Two-sided z-score for a confidence level: Φ⁻¹((1+confidence)/2).
/// 0.90 gives ≈ 1.645.
fn two_sided_z(confidence: f64) -> f64 {
    // Standard normal exists for these fixed parameters
    let normal = Normal::new(0.0, 1.0).expect("standard normal");
    normal.inverse_cdf((1.0 + confidence) / 2.0)
}
