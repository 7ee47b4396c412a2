//! Forecasting models for historical series
//!
//! Every model shares one contract: given a history of at least three points
//! and a positive horizon, produce `periods` non-negative values plus a
//! heuristic confidence score in `[0, 1]`. Models that need randomness draw
//! it from the generator passed in by the caller.

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub mod autoregressive;
pub mod exponential;
pub mod linear;
pub mod monte_carlo;
pub mod seasonal;

pub use autoregressive::Autoregressive;
pub use exponential::ExponentialGrowth;
pub use linear::LinearTrend;
pub use monte_carlo::MonteCarlo;
pub use seasonal::SeasonalDecomposition;

/// Minimum history length accepted by every model
pub const MIN_HISTORY: usize = 3;

/// Closed set of forecasting algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelKind {
    /// Least-squares line through the history
    Linear,
    /// Compounding by the average period ratio
    Exponential,
    /// Moving-average trend times seasonal factors
    Seasonal,
    /// Lag-1 autoregression with a moving-average noise term
    Autoregressive,
    /// Mean of simulated return paths
    MonteCarlo,
}

impl ModelKind {
    /// All model kinds, in menu order
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Linear,
        ModelKind::Exponential,
        ModelKind::Seasonal,
        ModelKind::Autoregressive,
        ModelKind::MonteCarlo,
    ];

    /// Canonical identifier
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Exponential => "exponential",
            ModelKind::Seasonal => "seasonal",
            ModelKind::Autoregressive => "autoregressive",
            ModelKind::MonteCarlo => "monteCarlo",
        }
    }

    /// Build the model for this kind
    pub fn model(&self, settings: &ModelSettings) -> Box<dyn ForecastModel> {
        match self {
            ModelKind::Linear => Box::new(LinearTrend),
            ModelKind::Exponential => Box::new(ExponentialGrowth),
            ModelKind::Seasonal => Box::new(SeasonalDecomposition),
            ModelKind::Autoregressive => Box::new(Autoregressive),
            ModelKind::MonteCarlo => Box::new(MonteCarlo::from_settings(settings)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "linear" => Ok(ModelKind::Linear),
            "exponential" => Ok(ModelKind::Exponential),
            "seasonal" => Ok(ModelKind::Seasonal),
            "arima" | "autoregressive" => Ok(ModelKind::Autoregressive),
            "monteCarlo" | "monte_carlo" | "monte-carlo" => Ok(ModelKind::MonteCarlo),
            other => Err(ForecastError::UnknownModel(other.to_string())),
        }
    }
}

/// Raw model output before metrics are attached
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Forecasted values, one per period
    pub values: Vec<f64>,
    /// Heuristic confidence in `[0, 1]`
    pub confidence: f64,
    /// Simulated paths, for models that simulate and were asked to keep them
    pub paths: Option<Vec<Vec<f64>>>,
}

impl ModelOutput {
    pub(crate) fn new(values: Vec<f64>, confidence: f64) -> Self {
        Self {
            values,
            confidence,
            paths: None,
        }
    }
}

/// Shared flag a caller raises to abandon a running forecast
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the "not cancelled" state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Knobs that only some models read
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Number of Monte Carlo paths
    pub simulations: usize,
    /// Keep every simulated path in the output
    pub keep_paths: bool,
    /// Checked between Monte Carlo paths
    pub cancel: Option<CancelFlag>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            simulations: monte_carlo::DEFAULT_SIMULATIONS,
            keep_paths: false,
            cancel: None,
        }
    }
}

/// Common interface for forecasting models
pub trait ForecastModel: fmt::Debug + Send {
    /// Which kind of model this is
    fn kind(&self) -> ModelKind;

    /// Forecast `periods` values past the end of `history`
    fn forecast(
        &self,
        history: &HistoricalSeries,
        periods: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ModelOutput>;
}

/// Single dispatch point from a model kind to its forecast
pub fn forecast_with(
    kind: ModelKind,
    history: &HistoricalSeries,
    periods: usize,
    settings: &ModelSettings,
    rng: &mut dyn RngCore,
) -> Result<ModelOutput> {
    debug!(model = %kind, periods, history_len = history.len(), "dispatching forecast");
    kind.model(settings).forecast(history, periods, rng)
}

/// Reject histories and horizons no model can work with
pub(crate) fn validate_input(history: &HistoricalSeries, periods: usize) -> Result<Vec<f64>> {
    if history.len() < MIN_HISTORY {
        return Err(ForecastError::InsufficientData(format!(
            "Need at least {} historical points, got {}",
            MIN_HISTORY,
            history.len()
        )));
    }
    if periods == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast periods must be greater than zero".to_string(),
        ));
    }
    Ok(history.values())
}

/// Clamp a heuristic score, mapping NaN to the lower bound
pub(crate) fn clamp_confidence(raw: f64, lower: f64, upper: f64) -> f64 {
    if raw.is_nan() {
        lower
    } else {
        raw.clamp(lower, upper)
    }
}
