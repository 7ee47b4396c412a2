//! Exponential growth model

use crate::data::HistoricalSeries;
use crate::error::Result;
use crate::models::{clamp_confidence, validate_input, ForecastModel, ModelKind, ModelOutput};
use forecast_math::{mean, period_ratios, population_variance};
use rand::RngCore;
use tracing::debug;

/// Compounds the last value by the average period-over-period ratio
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialGrowth;

impl ForecastModel for ExponentialGrowth {
    fn kind(&self) -> ModelKind {
        ModelKind::Exponential
    }

    fn forecast(
        &self,
        history: &HistoricalSeries,
        periods: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<ModelOutput> {
        let values = validate_input(history, periods)?;
        let last = values[values.len() - 1];

        let ratios = period_ratios(&values);
        if ratios.is_empty() {
            debug!("no usable growth ratio, holding the last value flat");
            return Ok(ModelOutput::new(vec![last; periods], 0.4));
        }

        let average_ratio = mean(&ratios);
        let forecast = (1..=periods)
            .map(|step| (last * average_ratio.powi(step as i32)).max(0.0))
            .collect();

        let confidence = clamp_confidence(1.0 - population_variance(&ratios), 0.4, 0.9);

        Ok(ModelOutput::new(forecast, confidence))
    }
}
