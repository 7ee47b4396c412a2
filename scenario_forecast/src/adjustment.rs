//! Manual adjustment of forecast points
//!
//! A caller drags one forecast point to a new value. Later points are nudged
//! by the same relative change, scaled down exponentially with their distance
//! from the edited point. The input slice is never modified; every call
//! returns a fresh vector, and repeated calls compound.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Per-period decay of an adjustment's influence
pub const DECAY_RATE: f64 = 0.3;

/// One manual edit of a forecast point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentEvent {
    pub point_index: usize,
    pub original_value: f64,
    pub new_value: f64,
}

impl AdjustmentEvent {
    /// `new / original`, or `None` when the original value is zero
    pub fn ratio(&self) -> Option<f64> {
        (self.original_value > 0.0).then(|| self.new_value / self.original_value)
    }
}

/// Non-fatal conditions raised while applying an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentWarning {
    /// The original value was zero, so no ratio exists; later points were left as they were
    NonPropagatable,
}

/// Adjusted values together with what happened
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentOutcome {
    pub values: Vec<f64>,
    pub event: AdjustmentEvent,
    pub warning: Option<AdjustmentWarning>,
}

/// Influence of an edit on a point `distance` periods later: `e^(-rate * distance)`
pub fn propagation_weight(distance: usize, decay_rate: f64) -> f64 {
    (-decay_rate * distance as f64).exp()
}

/// Set `values[index]` to `new_value` and propagate with [`DECAY_RATE`]
pub fn adjust_point(values: &[f64], index: usize, new_value: f64) -> Result<AdjustmentOutcome> {
    adjust_point_with_decay(values, index, new_value, DECAY_RATE)
}

/// Set `values[index]` to `new_value` and propagate with a custom decay rate
pub fn adjust_point_with_decay(
    values: &[f64],
    index: usize,
    new_value: f64,
    decay_rate: f64,
) -> Result<AdjustmentOutcome> {
    if index >= values.len() {
        return Err(ForecastError::IndexOutOfRange(format!(
            "Point {} is outside a forecast of {} values",
            index,
            values.len()
        )));
    }
    if !new_value.is_finite() || new_value < 0.0 {
        return Err(ForecastError::IndexOutOfRange(format!(
            "Replacement value must be finite and non-negative, got {}",
            new_value
        )));
    }

    let event = AdjustmentEvent {
        point_index: index,
        original_value: values[index],
        new_value,
    };

    let mut adjusted = values.to_vec();
    adjusted[index] = new_value;

    let warning = match event.ratio() {
        Some(ratio) => {
            for (j, value) in adjusted.iter_mut().enumerate().skip(index + 1) {
                let weight = propagation_weight(j - index, decay_rate);
                *value *= 1.0 + (ratio - 1.0) * weight;
            }
            debug!(index, ratio, "propagated manual adjustment");
            None
        }
        None => {
            warn!(
                index,
                new_value, "original value is zero, adjustment not propagated"
            );
            Some(AdjustmentWarning::NonPropagatable)
        }
    };

    Ok(AdjustmentOutcome {
        values: adjusted,
        event,
        warning,
    })
}
