//! Summary metrics for a history joined with its forecast

use crate::data::HistoricalSeries;
use forecast_math::{autocorrelation, pct_changes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Periods per year assumed when annualizing
pub const PERIODS_PER_YEAR: usize = 12;

/// Combined length below which seasonality is reported as zero
pub const MIN_SEASONAL_POINTS: usize = 2 * PERIODS_PER_YEAR;

/// Direction of the annualized growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
}

/// Qualitative volatility bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

/// Qualitative seasonality bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalityStrength {
    Weak,
    Moderate,
    Strong,
}

/// Derived metrics; always recomputable from a history and a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetrics {
    /// Annualized compound growth, in percent
    pub growth_rate: f64,
    /// Root-mean-square of period returns
    pub volatility: f64,
    /// Magnitude of the lag-12 autocorrelation, in `[0, 1]`
    pub seasonality: f64,
    /// Sign of the growth rate
    pub trend: Trend,
}

impl ForecastMetrics {
    /// Low below 0.1, Medium below 0.3, High otherwise
    pub fn volatility_level(&self) -> VolatilityLevel {
        if self.volatility < 0.1 {
            VolatilityLevel::Low
        } else if self.volatility < 0.3 {
            VolatilityLevel::Medium
        } else {
            VolatilityLevel::High
        }
    }

    /// Weak below 0.2, Moderate below 0.5, Strong otherwise
    pub fn seasonality_strength(&self) -> SeasonalityStrength {
        if self.seasonality < 0.2 {
            SeasonalityStrength::Weak
        } else if self.seasonality < 0.5 {
            SeasonalityStrength::Moderate
        } else {
            SeasonalityStrength::Strong
        }
    }
}

impl fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Metrics:")?;
        writeln!(f, "  Growth Rate: {:+.1}%", self.growth_rate)?;
        writeln!(
            f,
            "  Volatility:  {:.4} ({:?})",
            self.volatility,
            self.volatility_level()
        )?;
        writeln!(
            f,
            "  Seasonality: {:.4} ({:?})",
            self.seasonality,
            self.seasonality_strength()
        )?;
        writeln!(f, "  Trend:       {:?}", self.trend)?;
        Ok(())
    }
}

/// Compute metrics over `history` followed by `forecast`
pub fn compute_metrics(history: &HistoricalSeries, forecast: &[f64]) -> ForecastMetrics {
    let mut all = history.values();
    all.extend_from_slice(forecast);

    let growth_rate = annualized_growth(history.first_value(), all[all.len() - 1], all.len());

    ForecastMetrics {
        growth_rate,
        volatility: rms_volatility(&all),
        seasonality: seasonality(&all),
        trend: if growth_rate > 0.0 {
            Trend::Positive
        } else {
            Trend::Negative
        },
    }
}

/// `((final / initial)^(12 / total_periods) - 1) * 100`
///
/// A non-positive starting value has no finite compound rate and yields 0.
pub fn annualized_growth(initial: f64, final_value: f64, total_periods: usize) -> f64 {
    if initial <= 0.0 || total_periods == 0 {
        return 0.0;
    }
    let exponent = PERIODS_PER_YEAR as f64 / total_periods as f64;
    ((final_value / initial).powf(exponent) - 1.0) * 100.0
}

/// Root-mean-square of period-over-period returns
pub fn rms_volatility(values: &[f64]) -> f64 {
    let returns = pct_changes(values);
    if returns.is_empty() {
        return 0.0;
    }
    (returns.iter().map(|r| r * r).sum::<f64>() / returns.len() as f64).sqrt()
}

/// `|autocorrelation at lag 12|`, or 0 without two full cycles of data
pub fn seasonality(values: &[f64]) -> f64 {
    if values.len() < MIN_SEASONAL_POINTS {
        return 0.0;
    }
    autocorrelation(values, PERIODS_PER_YEAR).abs().min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_labels() {
        let mut metrics = ForecastMetrics {
            growth_rate: 5.0,
            volatility: 0.05,
            seasonality: 0.1,
            trend: Trend::Positive,
        };
        assert_eq!(metrics.volatility_level(), VolatilityLevel::Low);
        assert_eq!(metrics.seasonality_strength(), SeasonalityStrength::Weak);

        metrics.volatility = 0.2;
        metrics.seasonality = 0.3;
        assert_eq!(metrics.volatility_level(), VolatilityLevel::Medium);
        assert_eq!(metrics.seasonality_strength(), SeasonalityStrength::Moderate);

        metrics.volatility = 0.3;
        metrics.seasonality = 0.5;
        assert_eq!(metrics.volatility_level(), VolatilityLevel::High);
        assert_eq!(metrics.seasonality_strength(), SeasonalityStrength::Strong);
    }

    #[test]
    fn test_annualized_growth() {
        // Doubling over exactly one year
        assert_relative_eq!(annualized_growth(100.0, 200.0, 12), 100.0, max_relative = 1e-12);
        // Doubling over two years
        assert_relative_eq!(
            annualized_growth(100.0, 200.0, 24),
            (2f64.sqrt() - 1.0) * 100.0,
            max_relative = 1e-12
        );
        assert_eq!(annualized_growth(0.0, 200.0, 12), 0.0);
    }

    #[test]
    fn test_rms_volatility() {
        assert_eq!(rms_volatility(&[10.0]), 0.0);
        assert_relative_eq!(rms_volatility(&[100.0, 110.0, 99.0]), 0.1, max_relative = 1e-12);
    }

    #[test]
    fn test_display() {
        let metrics = ForecastMetrics {
            growth_rate: 12.5,
            volatility: 0.2,
            seasonality: 0.6,
            trend: Trend::Positive,
        };
        let text = metrics.to_string();
        assert!(text.contains("+12.5%"));
        assert!(text.contains("Medium"));
        assert!(text.contains("Strong"));
    }
}
