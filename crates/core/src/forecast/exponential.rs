use crate::errors::CoreError;
use crate::models::forecast::ForecastKind;

use super::{band_z, check_series, residual_std, ForecastModel, Prediction};

/// Holt's linear exponential smoothing (level + trend).
///
/// One-step-ahead residuals collected during the smoothing pass drive
/// the confidence band, widened by √horizon as uncertainty compounds.
pub struct ExponentialSmoothingModel {
    /// Level smoothing factor
    alpha: f64,
    /// Trend smoothing factor
    beta: f64,
    fit: Option<SmoothingFit>,
}

struct SmoothingFit {
    level: f64,
    trend: f64,
    residual_std: f64,
}

impl ExponentialSmoothingModel {
    pub fn new() -> Self {
        Self::with_factors(0.3, 0.1)
    }

    /// Factors are clamped into (0, 1].
    pub fn with_factors(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: alpha.clamp(f64::EPSILON, 1.0),
            beta: beta.clamp(f64::EPSILON, 1.0),
            fit: None,
        }
    }
}

impl Default for ExponentialSmoothingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for ExponentialSmoothingModel {
    fn kind(&self) -> ForecastKind {
        ForecastKind::Exponential
    }

    fn train(&mut self, series: &[f64]) -> Result<(), CoreError> {
        check_series(series)?;

        let mut level = series[0];
        let mut trend = series[1] - series[0];
        let mut residuals = Vec::with_capacity(series.len() - 1);

        for &observed in &series[1..] {
            let forecast = level + trend;
            residuals.push(observed - forecast);

            let previous_level = level;
            level = self.alpha * observed + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - previous_level) + (1.0 - self.beta) * trend;
        }

        self.fit = Some(SmoothingFit {
            level,
            trend,
            residual_std: residual_std(&residuals),
        });
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<Prediction>, CoreError> {
        let fit = self
            .fit
            .as_ref()
            .ok_or_else(|| CoreError::Validation("Model has not been trained".into()))?;

        let z = band_z();
        Ok((1..=steps)
            .map(|h| {
                let value = fit.level + fit.trend * h as f64;
                let margin = z * fit.residual_std * (h as f64).sqrt();
                Prediction {
                    value,
                    lower: value - margin,
                    upper: value + margin,
                }
            })
            .collect())
    }
}
