use chrono::NaiveDate;

use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::forecast::{
    run_forecast, ArimaModel, ExponentialSmoothingModel, ForecastModel, LinearRegressionModel,
    MIN_TRAIN_SAMPLES,
};
use portfolio_tracker_core::models::forecast::ForecastKind;
use portfolio_tracker_core::models::price::Candle;

fn candles(closes: &[f64]) -> Vec<Candle> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        })
        .collect()
}

fn line(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

// ═══════════════════════════════════════════════════════════════════
//  Shared training validation
// ═══════════════════════════════════════════════════════════════════

mod training_validation {
    use super::*;

    #[test]
    fn too_few_samples_rejected_by_every_model() {
        let short = vec![100.0; MIN_TRAIN_SAMPLES - 1];
        let models: Vec<Box<dyn ForecastModel>> = vec![
            Box::new(ArimaModel::new()),
            Box::new(LinearRegressionModel::new()),
            Box::new(ExponentialSmoothingModel::new()),
        ];
        for mut model in models {
            assert!(model.train(&short).is_err(), "{}", model.kind());
        }
    }

    #[test]
    fn non_finite_values_rejected() {
        let mut series = line(20);
        series[10] = f64::NAN;
        let mut model = LinearRegressionModel::new();
        assert!(model.train(&series).is_err());
    }

    #[test]
    fn predict_before_train_fails() {
        let model = LinearRegressionModel::new();
        match model.predict(5).unwrap_err() {
            CoreError::Validation(msg) => assert!(msg.contains("trained")),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn minimum_length_series_trains() {
        let mut model = LinearRegressionModel::new();
        assert!(model.train(&line(MIN_TRAIN_SAMPLES)).is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Linear regression
// ═══════════════════════════════════════════════════════════════════

mod linear {
    use super::*;

    #[test]
    fn extends_a_perfect_line() {
        let mut model = LinearRegressionModel::new();
        model.train(&line(30)).unwrap();
        let predictions = model.predict(3).unwrap();
        // Series was 100..129; forecast continues 130, 131, 132
        assert!((predictions[0].value - 130.0).abs() < 1e-6);
        assert!((predictions[1].value - 131.0).abs() < 1e-6);
        assert!((predictions[2].value - 132.0).abs() < 1e-6);
    }

    #[test]
    fn zero_residual_collapses_band() {
        let mut model = LinearRegressionModel::new();
        model.train(&line(30)).unwrap();
        let p = &model.predict(1).unwrap()[0];
        assert!((p.lower - p.value).abs() < 1e-6);
        assert!((p.upper - p.value).abs() < 1e-6);
    }

    #[test]
    fn noisy_series_has_ordered_bounds() {
        let series: Vec<f64> = (0..40)
            .map(|i| 100.0 + i as f64 + if i % 2 == 0 { 2.0 } else { -2.0 })
            .collect();
        let mut model = LinearRegressionModel::new();
        model.train(&series).unwrap();
        for p in model.predict(5).unwrap() {
            assert!(p.lower < p.value);
            assert!(p.value < p.upper);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Exponential smoothing
// ═══════════════════════════════════════════════════════════════════

mod exponential {
    use super::*;

    #[test]
    fn flat_series_predicts_the_level() {
        let mut model = ExponentialSmoothingModel::new();
        model.train(&vec![100.0; 50]).unwrap();
        for p in model.predict(5).unwrap() {
            assert!((p.value - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn trending_series_keeps_trending() {
        let mut model = ExponentialSmoothingModel::new();
        model.train(&line(50)).unwrap();
        let predictions = model.predict(5).unwrap();
        assert!(predictions[0].value > 148.0);
        assert!(predictions[4].value > predictions[0].value);
    }

    #[test]
    fn band_widens_with_horizon() {
        let series: Vec<f64> = (0..50)
            .map(|i| 100.0 + i as f64 * 0.5 + ((i * 7) % 5) as f64)
            .collect();
        let mut model = ExponentialSmoothingModel::new();
        model.train(&series).unwrap();
        let predictions = model.predict(10).unwrap();
        let near = predictions[0].upper - predictions[0].lower;
        let far = predictions[9].upper - predictions[9].lower;
        assert!(far > near);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Differenced autoregression
// ═══════════════════════════════════════════════════════════════════

mod arima {
    use super::*;

    #[test]
    fn constant_drift_series_extends_linearly() {
        // Constant differences → pure drift fit
        let mut model = ArimaModel::new();
        model.train(&line(30)).unwrap();
        let predictions = model.predict(3).unwrap();
        assert!((predictions[0].value - 130.0).abs() < 1e-6);
        assert!((predictions[2].value - 132.0).abs() < 1e-6);
    }

    #[test]
    fn flat_series_stays_flat() {
        let mut model = ArimaModel::new();
        model.train(&vec![100.0; 30]).unwrap();
        for p in model.predict(5).unwrap() {
            assert!((p.value - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn band_widens_with_horizon() {
        let series: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 3.0)
            .collect();
        let mut model = ArimaModel::new();
        model.train(&series).unwrap();
        let predictions = model.predict(10).unwrap();
        let near = predictions[0].upper - predictions[0].lower;
        let far = predictions[9].upper - predictions[9].lower;
        assert!(far > near);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  run_forecast — candles in, dated forecast out
// ═══════════════════════════════════════════════════════════════════

mod run {
    use super::*;

    #[test]
    fn zero_steps_rejected() {
        let result = run_forecast(ForecastKind::Linear, &candles(&line(30)), 0);
        assert!(result.is_err());
    }

    #[test]
    fn empty_history_rejected() {
        let result = run_forecast(ForecastKind::Linear, &[], 5);
        assert!(result.is_err());
    }

    #[test]
    fn dates_continue_daily_past_the_last_candle() {
        let input = candles(&line(30));
        let last_date = input.last().unwrap().date;
        let forecast = run_forecast(ForecastKind::Linear, &input, 4).unwrap();

        assert_eq!(forecast.model, ForecastKind::Linear);
        assert_eq!(forecast.points.len(), 4);
        for (i, point) in forecast.points.iter().enumerate() {
            assert_eq!(point.date, last_date + chrono::Duration::days(i as i64 + 1));
        }
    }

    #[test]
    fn every_kind_runs_end_to_end() {
        let input = candles(&line(40));
        for kind in [
            ForecastKind::Arima,
            ForecastKind::Linear,
            ForecastKind::Exponential,
        ] {
            let forecast = run_forecast(kind, &input, 7).unwrap();
            assert_eq!(forecast.model, kind);
            assert_eq!(forecast.points.len(), 7);
            for p in &forecast.points {
                assert!(p.lower <= p.predicted);
                assert!(p.predicted <= p.upper);
            }
        }
    }
}
