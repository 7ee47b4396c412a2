//! Trend/seasonal decomposition of a series

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Result of splitting a series into a trend and multiplicative seasonal factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Centered moving-average trend, same length as the input
    pub trend: Vec<f64>,
    /// One multiplicative factor per phase of the cycle
    pub seasonal: Vec<f64>,
    /// Phases that had no usable observation and fell back to a factor of 1.0
    pub neutral_phases: Vec<usize>,
}

impl Decomposition {
    /// Length of the seasonal cycle
    pub fn season_length(&self) -> usize {
        self.seasonal.len()
    }

    /// Seasonal factor for an arbitrary position, wrapping around the cycle
    pub fn factor_at(&self, position: usize) -> f64 {
        self.seasonal[position % self.seasonal.len()]
    }
}

/// Decompose `values` into a trend and per-phase seasonal factors.
///
/// The trend is a centered moving average of width `2 * (season_length / 2) + 1`;
/// positions too close to either edge copy the nearest computed value. A
/// phase's factor is the mean ratio of value to trend over points whose
/// trend is positive.
pub fn decompose(values: &[f64], season_length: usize) -> Result<Decomposition> {
    if season_length == 0 {
        return Err(MathError::InvalidInput(
            "Season length must be at least 1".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot decompose an empty series".to_string(),
        ));
    }
    if season_length > values.len() {
        return Err(MathError::InvalidInput(format!(
            "Season length ({}) exceeds series length ({})",
            season_length,
            values.len()
        )));
    }

    let trend = centered_moving_average(values, season_length / 2);

    let mut sums = vec![0.0; season_length];
    let mut counts = vec![0usize; season_length];
    for (i, (&value, &level)) in values.iter().zip(&trend).enumerate() {
        if level > 0.0 {
            sums[i % season_length] += value / level;
            counts[i % season_length] += 1;
        }
    }

    let mut neutral_phases = Vec::new();
    let seasonal = sums
        .iter()
        .zip(&counts)
        .enumerate()
        .map(|(phase, (&sum, &count))| {
            if count > 0 {
                sum / count as f64
            } else {
                neutral_phases.push(phase);
                1.0
            }
        })
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        neutral_phases,
    })
}

fn centered_moving_average(values: &[f64], half: usize) -> Vec<f64> {
    let n = values.len();
    let width = 2 * half + 1;

    if n < width {
        let mean = values.iter().sum::<f64>() / n as f64;
        return vec![mean; n];
    }

    let mut trend = vec![0.0; n];
    for i in half..n - half {
        let window = &values[i - half..=i + half];
        trend[i] = window.iter().sum::<f64>() / width as f64;
    }

    // Edges
    for i in 0..half {
        trend[i] = trend[half];
        trend[n - 1 - i] = trend[n - 1 - half];
    }

    trend
}
