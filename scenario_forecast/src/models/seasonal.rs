//! Seasonal decomposition model

use crate::data::HistoricalSeries;
use crate::error::Result;
use crate::models::{validate_input, ForecastModel, ModelKind, ModelOutput};
use forecast_math::{decompose, trend_slope};
use rand::RngCore;
use tracing::warn;

/// Longest cycle the model looks for (one year of monthly data)
pub const MAX_SEASON_LENGTH: usize = 12;

const CONFIDENCE: f64 = 0.75;

/// Season length used for a history of `len` points: `min(12, len / 2)`
pub fn season_length(len: usize) -> usize {
    MAX_SEASON_LENGTH.min(len / 2)
}

/// Linear extension of the moving-average trend, scaled by seasonal factors
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalDecomposition;

impl ForecastModel for SeasonalDecomposition {
    fn kind(&self) -> ModelKind {
        ModelKind::Seasonal
    }

    fn forecast(
        &self,
        history: &HistoricalSeries,
        periods: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<ModelOutput> {
        let values = validate_input(history, periods)?;
        let cycle = season_length(values.len());

        let decomposition = decompose(&values, cycle)?;
        if !decomposition.neutral_phases.is_empty() {
            warn!(
                phases = ?decomposition.neutral_phases,
                "seasonal phases without usable observations default to a neutral factor"
            );
        }

        let slope = trend_slope(&decomposition.trend)?;
        let last_trend = decomposition.trend[decomposition.trend.len() - 1];

        let forecast = (0..periods)
            .map(|i| {
                let level = last_trend + slope * (i + 1) as f64;
                (level * decomposition.factor_at(i)).max(0.0)
            })
            .collect();

        Ok(ModelOutput::new(forecast, CONFIDENCE))
    }
}
