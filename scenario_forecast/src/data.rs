//! Historical series handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Months, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One observation per period (typically one month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Position of the period within the series
    pub index: usize,
    /// Observed value, never negative
    pub value: f64,
    /// Start of the period, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TimeSeriesPoint {
    /// Create an undated point
    pub fn new(index: usize, value: f64) -> Self {
        Self {
            index,
            value,
            timestamp: None,
        }
    }

    /// Attach a timestamp to the point
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Validated, immutable historical series
///
/// Holds at least one point; indices are contiguous and strictly increasing
/// and every value is finite and non-negative. Adjustments never mutate a
/// series, they build a new one through [`HistoricalSeries::with_values`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeSeriesPoint>", into = "Vec<TimeSeriesPoint>")]
pub struct HistoricalSeries {
    points: Vec<TimeSeriesPoint>,
}

impl HistoricalSeries {
    /// Validate and wrap a sequence of points
    pub fn new(points: Vec<TimeSeriesPoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::ValidationError(
                "Historical series must contain at least one point".to_string(),
            ));
        }

        for pair in points.windows(2) {
            if pair[0].index.checked_add(1) != Some(pair[1].index) {
                return Err(ForecastError::ValidationError(format!(
                    "Point indices must be contiguous: {} is followed by {}",
                    pair[0].index, pair[1].index
                )));
            }
        }

        if let Some(bad) = points
            .iter()
            .find(|p| !p.value.is_finite() || p.value < 0.0)
        {
            return Err(ForecastError::ValidationError(format!(
                "Value at index {} must be finite and non-negative, got {}",
                bad.index, bad.value
            )));
        }

        Ok(Self { points })
    }

    /// Build an undated series indexed `0..n`
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeSeriesPoint::new(i, v))
            .collect();
        Self::new(points)
    }

    /// Build a monthly series starting at `start`
    pub fn from_dated_values(start: DateTime<Utc>, values: &[f64]) -> Result<Self> {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let point = TimeSeriesPoint::new(i, v);
                match add_months(start, i) {
                    Some(ts) => Ok(point.with_timestamp(ts)),
                    None => Err(ForecastError::ValidationError(format!(
                        "Timestamp for period {} is out of range",
                        i
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(points)
    }

    /// Copy of this series with replaced values; indices and timestamps are kept
    pub fn with_values(&self, values: &[f64]) -> Result<Self> {
        if values.len() != self.points.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match series length ({})",
                values.len(),
                self.points.len()
            )));
        }

        let points = self
            .points
            .iter()
            .zip(values)
            .map(|(p, &value)| TimeSeriesPoint { value, ..p.clone() })
            .collect();
        Self::new(points)
    }

    /// The points of the series
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// The observed values in order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First observed value
    pub fn first_value(&self) -> f64 {
        self.points[0].value
    }

    /// Last observed value
    pub fn last_value(&self) -> f64 {
        self.points[self.points.len() - 1].value
    }

    /// Timestamp of the last point, if dated
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().and_then(|p| p.timestamp)
    }

    /// Monthly timestamps for the `periods` periods following the series
    pub fn future_timestamps(&self, periods: usize) -> Option<Vec<DateTime<Utc>>> {
        let last = self.last_timestamp()?;
        (1..=periods).map(|step| add_months(last, step)).collect()
    }
}

impl TryFrom<Vec<TimeSeriesPoint>> for HistoricalSeries {
    type Error = ForecastError;

    fn try_from(points: Vec<TimeSeriesPoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<HistoricalSeries> for Vec<TimeSeriesPoint> {
    fn from(series: HistoricalSeries) -> Self {
        series.points
    }
}

fn add_months(start: DateTime<Utc>, months: usize) -> Option<DateTime<Utc>> {
    let months = u32::try_from(months).ok()?;
    start.checked_add_months(Months::new(months))
}

/// Synthetic monthly revenue history used for demos and smoke tests
///
/// Each month is `8000 + 200 * i + 2000 * sin(i * pi / 6)` plus uniform
/// noise of +/-500, floored at zero.
pub fn sample_history<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    months: usize,
) -> Result<HistoricalSeries> {
    let values: Vec<f64> = (0..months)
        .map(|i| {
            let i = i as f64;
            let base = 8000.0 + i * 200.0;
            let seasonal = (i * PI / 6.0).sin() * 2000.0;
            let noise = forecast_math::centered_uniform(rng) * 1000.0;
            (base + seasonal + noise).max(0.0)
        })
        .collect();
    HistoricalSeries::from_dated_values(start, &values)
}

/// Fallback series shown when no scenario data is available: `1000 + 120 * i`
pub fn baseline_series(start: DateTime<Utc>, months: usize) -> Result<HistoricalSeries> {
    let values: Vec<f64> = (0..months).map(|i| 1000.0 + i as f64 * 120.0).collect();
    HistoricalSeries::from_dated_values(start, &values)
}
