//! # Forecast Math
//!
//! Numeric building blocks for the forecasting engine.
//! Every function in this crate is pure and stateless: it reads plain `f64`
//! slices and returns new values. Functions that need entropy take the
//! random source as an argument so callers can seed it.

use thiserror::Error;

pub mod decomposition;
pub mod regression;
pub mod sampling;
pub mod statistics;

pub use decomposition::{decompose, Decomposition};
pub use regression::{autocorrelation, correlation, linear_regression, trend_slope};
pub use sampling::{centered_uniform, normal_sample};
pub use statistics::{
    mean, pct_changes, period_ratios, period_returns, population_std_dev, population_variance,
};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
