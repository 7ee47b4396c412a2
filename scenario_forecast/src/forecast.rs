//! Forecast results handed back to callers

use crate::data::HistoricalSeries;
use crate::metrics::{compute_metrics, ForecastMetrics};
use crate::models::ModelKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed forecast with its metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Model that produced the values
    pub model: ModelKind,
    /// Number of forecast periods
    pub periods: usize,
    /// Forecasted values, one per period, never negative
    pub values: Vec<f64>,
    /// Heuristic confidence in `[0, 1]`
    pub confidence: f64,
    /// Metrics over the history joined with `values`
    pub metrics: ForecastMetrics,
    /// When the forecast was generated
    pub generated_at: DateTime<Utc>,
    /// Period start for each value, when the history was dated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<DateTime<Utc>>>,
    /// Monte Carlo paths, when kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Vec<f64>>>,
}

/// Band drawn around a forecast, wider for lower confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceBand {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub half_width: f64,
}

impl ForecastResult {
    /// Value of the final forecast period
    pub fn final_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Copy of this result with replaced values and recomputed metrics
    ///
    /// `self` is left untouched; callers decide whether to keep the new result.
    pub fn with_values(&self, history: &HistoricalSeries, values: Vec<f64>) -> Self {
        let metrics = compute_metrics(history, &values);
        Self {
            values,
            metrics,
            ..self.clone()
        }
    }

    /// Band of `(1 - confidence) * 0.5` of the padded value range on each side
    ///
    /// The range spans `0.9 * min` to `1.1 * max` over the history and the
    /// forecast together. Lower bounds are floored at zero.
    pub fn confidence_band(&self, history: &HistoricalSeries) -> ConfidenceBand {
        let all = history.values().into_iter().chain(self.values.iter().copied());
        let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        let range = max * 1.1 - min * 0.9;
        let half_width = range * (1.0 - self.confidence) * 0.5;

        ConfidenceBand {
            lower: self
                .values
                .iter()
                .map(|v| (v - half_width).max(0.0))
                .collect(),
            upper: self.values.iter().map(|v| v + half_width).collect(),
            half_width,
        }
    }

    /// Serialize the result as JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
