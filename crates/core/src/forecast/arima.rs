use crate::errors::CoreError;
use crate::models::forecast::ForecastKind;

use super::{band_z, check_series, residual_std, ForecastModel, Prediction};

/// Autoregressive model on the first-differenced series.
///
/// Differencing removes the trend, an AR(1) with drift is fitted to the
/// differences by least squares, and forecasts are integrated back to
/// price levels. The band widens by √horizon, matching the growth of
/// integrated one-step variance.
pub struct ArimaModel {
    fit: Option<ArFit>,
}

struct ArFit {
    /// Drift term of the differenced process
    constant: f64,
    /// AR(1) coefficient
    phi: f64,
    /// Last observed level, the integration anchor
    last_value: f64,
    /// Last observed difference, seed for the recursion
    last_diff: f64,
    residual_std: f64,
}

impl ArimaModel {
    pub fn new() -> Self {
        Self { fit: None }
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for ArimaModel {
    fn kind(&self) -> ForecastKind {
        ForecastKind::Arima
    }

    fn train(&mut self, series: &[f64]) -> Result<(), CoreError> {
        check_series(series)?;

        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

        // Regress d_t on d_{t-1}: d_t = c + phi·d_{t-1} + e_t
        let x = &diffs[..diffs.len() - 1];
        let y = &diffs[1..];
        let n = x.len() as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut x_variance = 0.0;
        for (xi, yi) in x.iter().zip(y) {
            covariance += (xi - x_mean) * (yi - y_mean);
            x_variance += (xi - x_mean).powi(2);
        }

        // A perfectly regular series (constant differences) has zero
        // variance; fall back to pure drift.
        let phi = if x_variance > f64::EPSILON {
            (covariance / x_variance).clamp(-0.99, 0.99)
        } else {
            0.0
        };
        let constant = y_mean - phi * x_mean;

        let residuals: Vec<f64> = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| yi - (constant + phi * xi))
            .collect();

        self.fit = Some(ArFit {
            constant,
            phi,
            last_value: series[series.len() - 1],
            last_diff: diffs[diffs.len() - 1],
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
        let mut predictions = Vec::with_capacity(steps);
        let mut level = fit.last_value;
        let mut diff = fit.last_diff;

        for h in 1..=steps {
            diff = fit.constant + fit.phi * diff;
            level += diff;
            let margin = z * fit.residual_std * (h as f64).sqrt();
            predictions.push(Prediction {
                value: level,
                lower: level - margin,
                upper: level + margin,
            });
        }
        Ok(predictions)
    }
}
