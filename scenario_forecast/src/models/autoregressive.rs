//! Autoregressive approximation (AR(1) with an MA(1)-style noise carry)

use crate::data::HistoricalSeries;
use crate::error::Result;
use crate::models::{validate_input, ForecastModel, ModelKind, ModelOutput};
use forecast_math::{centered_uniform, correlation};
use rand::RngCore;
use tracing::debug;

const CONFIDENCE: f64 = 0.65;
const NOISE_CARRY: f64 = 0.3;
const NOISE_SCALE: f64 = 0.1;

/// Lag-1 autoregression with stochastic noise proportional to the level
///
/// Each step is `previous * rho + previous_noise * 0.3 + noise`, where
/// `rho` is the lag-1 correlation of the history and `noise` is uniform in
/// `+/- 5%` of the previous value. Results differ run to run unless the
/// generator is seeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autoregressive;

impl ForecastModel for Autoregressive {
    fn kind(&self) -> ModelKind {
        ModelKind::Autoregressive
    }

    fn forecast(
        &self,
        history: &HistoricalSeries,
        periods: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ModelOutput> {
        let values = validate_input(history, periods)?;
        let n = values.len();

        let rho = correlation(&values[..n - 1], &values[1..])?;
        debug!(rho, "lag-1 correlation");

        let mut previous = values[n - 1];
        let mut previous_noise = 0.0;
        let mut forecast = Vec::with_capacity(periods);

        for _ in 0..periods {
            let predicted = previous * rho + previous_noise * NOISE_CARRY;
            let noise = centered_uniform(&mut *rng) * (previous * NOISE_SCALE);
            let value = predicted + noise;

            forecast.push(value.max(0.0));
            previous = value;
            previous_noise = noise;
        }

        Ok(ModelOutput::new(forecast, CONFIDENCE))
    }
}
