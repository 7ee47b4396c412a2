//! Error types for the scenario_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the scenario_forecast crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// History is too short for any model
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model identifier is not one of the known kinds
    #[error("Unknown forecast model: {0}")]
    UnknownModel(String),

    /// Regression or correlation on constant or empty input
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// No scenario registered under the given id
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    /// A scenario with the same id already exists
    #[error("Scenario already exists: {0}")]
    DuplicateScenario(String),

    /// Adjustment target outside the forecast or invalid replacement value
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to input validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The caller abandoned the computation
    #[error("Forecast cancelled")]
    Cancelled,

    /// Background forecasts need a running tokio runtime
    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// Some scenarios could not be recomputed; the rest were updated
    #[error("{} scenario update(s) failed", .0.len())]
    PartialUpdate(Vec<(String, ForecastError)>),

    /// Error while reading engine configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from series math that has no more specific mapping
    #[error("Math error: {0}")]
    Math(MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DegenerateInput(msg) => ForecastError::DegenerateInput(msg),
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            other => ForecastError::Math(other),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
