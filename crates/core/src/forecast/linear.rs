use crate::errors::CoreError;
use crate::models::forecast::ForecastKind;

use super::{band_z, check_series, residual_std, ForecastModel, Prediction};

/// Ordinary least-squares trend over the sample index.
///
/// Closed-form fit; the confidence band is the prediction ± z times the
/// in-sample residual standard deviation.
pub struct LinearRegressionModel {
    fit: Option<LinearFit>,
}

struct LinearFit {
    intercept: f64,
    slope: f64,
    residual_std: f64,
    n: usize,
}

impl LinearRegressionModel {
    pub fn new() -> Self {
        Self { fit: None }
    }
}

impl Default for LinearRegressionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearRegressionModel {
    fn kind(&self) -> ForecastKind {
        ForecastKind::Linear
    }

    fn train(&mut self, series: &[f64]) -> Result<(), CoreError> {
        check_series(series)?;

        let n = series.len();
        let nf = n as f64;
        let t_mean = (nf - 1.0) / 2.0;
        let y_mean = series.iter().sum::<f64>() / nf;

        let mut covariance = 0.0;
        let mut t_variance = 0.0;
        for (t, y) in series.iter().enumerate() {
            let dt = t as f64 - t_mean;
            covariance += dt * (y - y_mean);
            t_variance += dt * dt;
        }

        // t_variance is 0 only for a single-point series, excluded above
        let slope = covariance / t_variance;
        let intercept = y_mean - slope * t_mean;

        let residuals: Vec<f64> = series
            .iter()
            .enumerate()
            .map(|(t, y)| y - (intercept + slope * t as f64))
            .collect();

        self.fit = Some(LinearFit {
            intercept,
            slope,
            residual_std: residual_std(&residuals),
            n,
        });
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<Prediction>, CoreError> {
        let fit = self
            .fit
            .as_ref()
            .ok_or_else(|| CoreError::Validation("Model has not been trained".into()))?;

        let margin = band_z() * fit.residual_std;
        Ok((0..steps)
            .map(|h| {
                let t = (fit.n + h) as f64;
                let value = fit.intercept + fit.slope * t;
                Prediction {
                    value,
                    lower: value - margin,
                    upper: value + margin,
                }
            })
            .collect())
    }
}
