//! Regression and correlation helpers
//!
//! Contains:
//! - Ordinary least squares fit of `y` on `x`
//! - Slope of a series against its positions
//! - Pearson correlation
//! - Autocorrelation at a fixed lag

use crate::{MathError, Result};

const DENOMINATOR_EPSILON: f64 = 1e-10;

/// Fit `y = slope * x + intercept` by ordinary least squares.
///
/// Fails with [`MathError::DegenerateInput`] when the slices are empty, have
/// different lengths, or `x` has fewer than two distinct values.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    if x.len() != y.len() {
        return Err(MathError::DegenerateInput(format!(
            "x and y must have the same length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(MathError::DegenerateInput(
            "Cannot fit a regression to empty input".to_string(),
        ));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        numerator += (xi - x_mean) * (yi - y_mean);
        denominator += (xi - x_mean) * (xi - x_mean);
    }

    if denominator.abs() < DENOMINATOR_EPSILON {
        return Err(MathError::DegenerateInput(
            "Cannot calculate slope: x needs at least two distinct values".to_string(),
        ));
    }

    let slope = numerator / denominator;
    let intercept = y_mean - slope * x_mean;

    Ok((slope, intercept))
}

/// Slope of `values` regressed on their positions `0..n`.
pub fn trend_slope(values: &[f64]) -> Result<f64> {
    let positions: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    linear_regression(&positions, values).map(|(slope, _)| slope)
}

/// Pearson correlation coefficient in `[-1, 1]`.
///
/// A series with zero variance has no linear relationship with anything, so
/// the result is `0.0` rather than an error. Mismatched or empty input is
/// still rejected.
pub fn correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() || x.is_empty() {
        return Err(MathError::DegenerateInput(format!(
            "Correlation needs two non-empty series of equal length ({} vs {})",
            x.len(),
            y.len()
        )));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut x_var = 0.0;
    let mut y_var = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        covariance += dx * dy;
        x_var += dx * dx;
        y_var += dy * dy;
    }

    let denominator = (x_var * y_var).sqrt();
    if denominator < DENOMINATOR_EPSILON {
        return Ok(0.0);
    }

    Ok((covariance / denominator).clamp(-1.0, 1.0))
}

/// Autocorrelation of `values` at `lag`.
///
/// Returns `0.0` when the lag is not shorter than the series or the series
/// is constant.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if lag >= n {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / n as f64;

    let numerator: f64 = values
        .iter()
        .zip(&values[lag..])
        .map(|(&a, &b)| (a - mean) * (b - mean))
        .sum();
    let denominator: f64 = values.iter().map(|&v| (v - mean).powi(2)).sum();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
