//! # Scenario Forecast
//!
//! Interactive financial forecasting with scenario modeling.
//!
//! ## Features
//!
//! - Five forecasting models (Linear, Exponential, Seasonal, Autoregressive, Monte Carlo)
//! - Named scenarios that reweight the history by growth, seasonality and volatility
//! - Manual adjustment of forecast points with exponentially decaying propagation
//! - Summary metrics (annualized growth, volatility, seasonality, trend)
//! - Cancellable and async Monte Carlo runs
//!
//! ## Quick Start
//!
//! ```rust
//! use scenario_forecast::{ForecastEngine, HistoricalSeries, ModelKind};
//!
//! let history = HistoricalSeries::from_values(&[100.0, 110.0, 120.0, 130.0])?;
//! let mut engine = ForecastEngine::with_seed(42);
//!
//! // Forecast the next three periods
//! let forecast = engine.generate_forecast(&history, ModelKind::Linear, 3)?;
//! assert_eq!(forecast.values.len(), 3);
//!
//! // Drag the first point and let the change fade out over later points
//! let (adjusted, _warning) = engine.adjust_forecast(&forecast, &history, 0, 150.0)?;
//! assert_eq!(adjusted.values[0], 150.0);
//!
//! // Activate a scenario and recompute its forecast
//! engine.activate_scenario("optimistic")?;
//! engine.update_scenario("optimistic", &history)?;
//! # Ok::<(), scenario_forecast::ForecastError>(())
//! ```

pub mod adjustment;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod scenarios;

// Re-export commonly used types
pub use crate::adjustment::{
    adjust_point, propagation_weight, AdjustmentEvent, AdjustmentOutcome, AdjustmentWarning,
    DECAY_RATE,
};
pub use crate::config::EngineConfig;
pub use crate::data::{baseline_series, sample_history, HistoricalSeries, TimeSeriesPoint};
pub use crate::engine::{ForecastEngine, PendingForecast};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{ConfidenceBand, ForecastResult};
pub use crate::metrics::{compute_metrics, ForecastMetrics, Trend};
pub use crate::models::{CancelFlag, ForecastModel, ModelKind, ModelOutput, ModelSettings};
pub use crate::scenarios::{
    apply_parameters, Scenario, ScenarioManager, ScenarioParameters, ScenarioSummary,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
