//! # Tour Forecast
//!
//! Financial forecasting and scenario modeling for tour revenue.
//!
//! This crate bundles the workspace members:
//!
//! - [`math`]: series utilities (regression, decomposition, sampling, statistics)
//! - [`forecast`]: models, scenarios, point adjustment and the [`ForecastEngine`]
//!
//! ## Example
//!
//! ```
//! use tour_forecast::{ForecastEngine, HistoricalSeries, ModelKind};
//!
//! let history = HistoricalSeries::from_values(&[100.0, 200.0, 300.0, 400.0]).unwrap();
//! let mut engine = ForecastEngine::with_seed(7);
//!
//! let forecast = engine.generate_forecast(&history, ModelKind::Linear, 3).unwrap();
//! assert_eq!(forecast.values.len(), 3);
//! ```

pub use forecast_math as math;
pub use scenario_forecast as forecast;

pub use scenario_forecast::{
    EngineConfig, ForecastEngine, ForecastError, ForecastResult, HistoricalSeries, ModelKind,
    Scenario, ScenarioParameters,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_exposes_both_crates() {
        let slope = math::trend_slope(&[1.0, 2.0, 3.0]).unwrap();
        assert!((slope - 1.0).abs() < 1e-12);

        let kind: ModelKind = "arima".parse().unwrap();
        assert_eq!(kind, forecast::ModelKind::Autoregressive);
    }
}
