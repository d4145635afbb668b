use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Which forecasting strategy to run. Selectable by name, matching the
/// strategy's `name()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastKind {
    Arima,
    Linear,
    Exponential,
}

impl ForecastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastKind::Arima => "arima",
            ForecastKind::Linear => "linear",
            ForecastKind::Exponential => "exponential",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_lowercase().as_str() {
            "arima" => Ok(ForecastKind::Arima),
            "linear" => Ok(ForecastKind::Linear),
            "exponential" => Ok(ForecastKind::Exponential),
            other => Err(CoreError::UnknownModel(other.to_string())),
        }
    }
}

impl std::fmt::Display for ForecastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One predicted point on the forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Prediction series plus confidence band returned by a forecast model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub model: ForecastKind,
    pub points: Vec<ForecastPoint>,
}
