//! Monte Carlo simulation of future values from historical returns

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::models::{
    validate_input, CancelFlag, ForecastModel, ModelKind, ModelOutput, ModelSettings,
};
use forecast_math::{mean, normal_sample, period_returns, population_std_dev};
use rand::RngCore;
use tracing::{debug, warn};

/// Paths simulated when no count is configured
pub const DEFAULT_SIMULATIONS: usize = 1000;

const CONFIDENCE: f64 = 0.8;

/// Pointwise mean of simulated paths driven by normally distributed returns
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    simulations: usize,
    keep_paths: bool,
    cancel: Option<CancelFlag>,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATIONS)
    }
}

impl MonteCarlo {
    /// Create a simulator running `simulations` paths
    pub fn new(simulations: usize) -> Self {
        Self {
            simulations,
            keep_paths: false,
            cancel: None,
        }
    }

    /// Build from shared model settings
    pub fn from_settings(settings: &ModelSettings) -> Self {
        Self {
            simulations: settings.simulations,
            keep_paths: settings.keep_paths,
            cancel: settings.cancel.clone(),
        }
    }

    /// Keep every simulated path in the output
    pub fn keep_paths(mut self, keep: bool) -> Self {
        self.keep_paths = keep;
        self
    }

    /// Check `flag` between paths and stop early when it is raised
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Number of simulated paths
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

impl ForecastModel for MonteCarlo {
    fn kind(&self) -> ModelKind {
        ModelKind::MonteCarlo
    }

    fn forecast(
        &self,
        history: &HistoricalSeries,
        periods: usize,
        rng: &mut dyn RngCore,
    ) -> Result<ModelOutput> {
        let values = validate_input(history, periods)?;
        if self.simulations == 0 {
            return Err(ForecastError::InvalidParameter(
                "Monte Carlo needs at least one simulation".to_string(),
            ));
        }

        let returns = period_returns(&values);
        let mean_return = mean(&returns);
        let return_std = population_std_dev(&returns);
        let start = values[values.len() - 1];
        debug!(
            mean_return,
            return_std,
            simulations = self.simulations,
            "simulating return paths"
        );

        let mut sums = vec![0.0; periods];
        let mut paths = if self.keep_paths {
            Vec::with_capacity(self.simulations)
        } else {
            Vec::new()
        };

        for _ in 0..self.simulations {
            if self.is_cancelled() {
                warn!("Monte Carlo simulation cancelled");
                return Err(ForecastError::Cancelled);
            }

            let mut current = start;
            let mut path = Vec::with_capacity(periods);
            for sum in sums.iter_mut() {
                let simulated_return = normal_sample(rng) * return_std + mean_return;
                current *= 1.0 + simulated_return;
                let value = current.max(0.0);
                *sum += value;
                path.push(value);
            }

            if self.keep_paths {
                paths.push(path);
            }
        }

        let forecast = sums
            .into_iter()
            .map(|sum| sum / self.simulations as f64)
            .collect();

        Ok(ModelOutput {
            values: forecast,
            confidence: CONFIDENCE,
            paths: self.keep_paths.then_some(paths),
        })
    }
}
