//! Price forecasting strategies.
//!
//! Each strategy is a pluggable black box behind `ForecastModel`:
//! `train` fits it to a chronological close series, `predict` returns a
//! prediction series with a confidence band. Strategies are selectable
//! by name ("arima" | "linear" | "exponential").

mod arima;
mod exponential;
mod linear;

pub use arima::ArimaModel;
pub use exponential::ExponentialSmoothingModel;
pub use linear::LinearRegressionModel;

use chrono::{Duration, NaiveDate};

use crate::errors::CoreError;
use crate::models::forecast::{Forecast, ForecastKind, ForecastPoint};
use crate::models::price::Candle;

/// Fewest closes any strategy will accept for training.
pub const MIN_TRAIN_SAMPLES: usize = 10;

/// One predicted value with its confidence bounds, before dates are
/// attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Strategy contract for all forecasting models.
pub trait ForecastModel: Send {
    fn kind(&self) -> ForecastKind;

    /// Fit the model to a chronological close-price series.
    fn train(&mut self, series: &[f64]) -> Result<(), CoreError>;

    /// Predict `steps` values past the end of the training series.
    /// Errors if called before a successful `train`.
    fn predict(&self, steps: usize) -> Result<Vec<Prediction>, CoreError>;
}

/// Instantiate a strategy by kind.
pub fn model_for(kind: ForecastKind) -> Box<dyn ForecastModel> {
    match kind {
        ForecastKind::Arima => Box::new(ArimaModel::new()),
        ForecastKind::Linear => Box::new(LinearRegressionModel::new()),
        ForecastKind::Exponential => Box::new(ExponentialSmoothingModel::new()),
    }
}

/// Train the selected strategy on a candle history and produce a dated
/// forecast, one point per day past the last candle.
pub fn run_forecast(
    kind: ForecastKind,
    candles: &[Candle],
    steps: usize,
) -> Result<Forecast, CoreError> {
    if steps == 0 {
        return Err(CoreError::Validation(
            "Forecast steps must be at least 1".into(),
        ));
    }
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let mut model = model_for(kind);
    model.train(&closes)?;
    let predictions = model.predict(steps)?;

    let last_date = candles
        .last()
        .map(|c| c.date)
        .ok_or_else(|| CoreError::Validation("Cannot forecast an empty series".into()))?;

    let points = predictions
        .iter()
        .enumerate()
        .map(|(i, p)| ForecastPoint {
            date: future_date(last_date, i + 1),
            predicted: p.value,
            lower: p.lower,
            upper: p.upper,
        })
        .collect();

    Ok(Forecast {
        model: kind,
        points,
    })
}

fn future_date(last: NaiveDate, offset_days: usize) -> NaiveDate {
    last + Duration::days(offset_days as i64)
}

/// Shared training validation.
pub(crate) fn check_series(series: &[f64]) -> Result<(), CoreError> {
    if series.len() < MIN_TRAIN_SAMPLES {
        return Err(CoreError::Validation(format!(
            "Need at least {MIN_TRAIN_SAMPLES} samples to train, got {}",
            series.len()
        )));
    }
    if series.iter().any(|x| !x.is_finite()) {
        return Err(CoreError::Validation(
            "Training series contains non-finite values".into(),
        ));
    }
    Ok(())
}

/// Sample standard deviation of residuals; 0 for degenerate inputs.
pub(crate) fn residual_std(residuals: &[f64]) -> f64 {
    if residuals.len() < 2 {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// z for the 95% two-sided band carried on forecast output.
pub(crate) fn band_z() -> f64 {
    use statrs::distribution::{ContinuousCDF, Normal};
    let normal = Normal::new(0.0, 1.0).expect("standard normal");
    normal.inverse_cdf(0.975)
}
