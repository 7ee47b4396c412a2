//! Orchestration of models, scenarios and adjustments
//!
//! [`ForecastEngine`] is the single entry point external callers need. It owns
//! the scenario set, the configuration and the random generator used by the
//! models that draw noise, so a seeded engine is fully reproducible.

use crate::adjustment::{adjust_point_with_decay, AdjustmentOutcome, AdjustmentWarning};
use crate::config::EngineConfig;
use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastResult;
use crate::metrics::{self, ForecastMetrics};
use crate::models::{forecast_with, CancelFlag, ModelKind, ModelSettings};
use crate::scenarios::{apply_parameters, Scenario, ScenarioManager, ScenarioParameters, ScenarioSummary};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Forecasting engine holding scenarios, configuration and randomness
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    scenarios: ScenarioManager,
    config: EngineConfig,
    rng: StdRng,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastEngine {
    /// Engine with the built-in scenarios, default configuration and an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Reproducible engine seeded with `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Engine drawing from a caller-supplied generator
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            scenarios: ScenarioManager::with_templates(),
            config: EngineConfig::default(),
            rng,
        }
    }

    /// Replace the configuration on an existing engine
    pub fn set_config(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forecast `periods` values past `history` with `kind`
    pub fn generate_forecast(
        &mut self,
        history: &HistoricalSeries,
        kind: ModelKind,
        periods: usize,
    ) -> Result<ForecastResult> {
        let settings = self.config.model_settings();
        build_result(history, kind, periods, &settings, &mut self.rng)
    }

    /// Like [`generate_forecast`](Self::generate_forecast) with the model given by id
    pub fn generate_forecast_by_name(
        &mut self,
        history: &HistoricalSeries,
        model: &str,
        periods: usize,
    ) -> Result<ForecastResult> {
        let kind = model.parse::<ModelKind>()?;
        self.generate_forecast(history, kind, periods)
    }

    /// Forecast that is abandoned once `cancel` is raised
    ///
    /// Monte Carlo checks the flag between paths; the other models are fast
    /// enough that the flag is only checked once they finish.
    pub fn generate_forecast_cancellable(
        &mut self,
        history: &HistoricalSeries,
        kind: ModelKind,
        periods: usize,
        cancel: &CancelFlag,
    ) -> Result<ForecastResult> {
        let settings = ModelSettings {
            cancel: Some(cancel.clone()),
            ..self.config.model_settings()
        };
        let result = build_result(history, kind, periods, &settings, &mut self.rng)?;
        discard_if_cancelled(result, cancel)
    }

    /// Start a forecast on tokio's blocking thread pool
    ///
    /// The generator and settings are forked before this returns, so the
    /// handle borrows nothing and the engine stays usable while the task
    /// runs. Await the handle for the result. Dropping it before completion
    /// raises `cancel`, which stops a Monte Carlo run between paths.
    ///
    /// Must be called from within a tokio runtime.
    pub fn generate_forecast_async(
        &mut self,
        history: HistoricalSeries,
        kind: ModelKind,
        periods: usize,
        cancel: CancelFlag,
    ) -> Result<PendingForecast> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| ForecastError::RuntimeUnavailable(err.to_string()))?;

        let mut rng = StdRng::seed_from_u64(self.rng.next_u64());
        let settings = ModelSettings {
            cancel: Some(cancel.clone()),
            ..self.config.model_settings()
        };

        let task = runtime.spawn_blocking(move || {
            build_result(&history, kind, periods, &settings, &mut rng)
        });

        Ok(PendingForecast {
            task,
            cancel,
            finished: false,
        })
    }

    /// Register an ad-hoc scenario
    pub fn create_scenario(
        &mut self,
        name: &str,
        parameters: ScenarioParameters,
        description: &str,
    ) -> Result<Scenario> {
        self.scenarios
            .create(name, parameters, description)
            .map(Scenario::clone)
    }

    /// Make `id` the only active scenario
    pub fn activate_scenario(&mut self, id: &str) -> Result<()> {
        self.scenarios.activate(id)
    }

    /// Clear the active flag of `id`
    pub fn deactivate_scenario(&mut self, id: &str) -> Result<()> {
        self.scenarios.deactivate(id)
    }

    /// Flip the active flag of `id`, returning the new state
    pub fn toggle_scenario(&mut self, id: &str) -> Result<bool> {
        self.scenarios.toggle(id)
    }

    /// Drop `id` from the scenario set
    pub fn remove_scenario(&mut self, id: &str) -> Result<Scenario> {
        self.scenarios.remove(id)
    }

    /// Recompute the forecast of `id` from `history` and store it
    pub fn update_scenario(
        &mut self,
        id: &str,
        history: &HistoricalSeries,
    ) -> Result<ForecastResult> {
        let parameters = self
            .scenarios
            .get(id)
            .ok_or_else(|| ForecastError::ScenarioNotFound(id.to_string()))?
            .parameters;

        let adjusted = apply_parameters(history, &parameters, &mut self.rng)?;
        let forecast = self.generate_forecast(
            &adjusted,
            self.config.scenario_model,
            self.config.default_periods,
        )?;
        self.scenarios.set_forecast(id, forecast.clone())?;

        info!(id, final_value = ?forecast.final_value(), "scenario forecast updated");
        Ok(forecast)
    }

    /// Recompute every scenario, in insertion order
    ///
    /// A failing scenario does not stop the others. Failures are collected
    /// into [`ForecastError::PartialUpdate`] with the id of each scenario
    /// that kept its previous forecast.
    pub fn update_all_scenarios(&mut self, history: &HistoricalSeries) -> Result<()> {
        let ids: Vec<String> = self.scenarios.list().iter().map(|s| s.id.clone()).collect();

        let mut failures = Vec::new();
        for id in ids {
            if let Err(err) = self.update_scenario(&id, history) {
                warn!(id = %id, %err, "scenario update failed");
                failures.push((id, err));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ForecastError::PartialUpdate(failures))
        }
    }

    /// Upsert and activate the slider-driven scenario
    ///
    /// Its forecast is cleared; call [`update_scenario`](Self::update_scenario)
    /// to compute one, otherwise [`current_forecast`](Self::current_forecast)
    /// falls back to the default model.
    pub fn apply_manual_adjustment(&mut self, parameters: ScenarioParameters) -> Result<Scenario> {
        self.scenarios
            .apply_manual_adjustment(parameters)
            .map(Scenario::clone)
    }

    /// Forecast for the main view
    ///
    /// The active scenario's stored forecast if it has one, otherwise a fresh
    /// forecast with the default model and horizon.
    pub fn current_forecast(&mut self, history: &HistoricalSeries) -> Result<ForecastResult> {
        if let Some(forecast) = self.scenarios.active().and_then(|s| s.forecast.clone()) {
            debug!(model = %forecast.model, "using active scenario forecast");
            return Ok(forecast);
        }
        self.generate_forecast(history, self.config.default_model, self.config.default_periods)
    }

    /// Move one forecast point and propagate with the configured decay
    pub fn adjust_forecast_point(
        &self,
        values: &[f64],
        index: usize,
        new_value: f64,
    ) -> Result<AdjustmentOutcome> {
        adjust_point_with_decay(values, index, new_value, self.config.decay_rate)
    }

    /// Adjust a forecast result and recompute its metrics
    ///
    /// `forecast` is left untouched; the adjusted copy is returned.
    pub fn adjust_forecast(
        &self,
        forecast: &ForecastResult,
        history: &HistoricalSeries,
        index: usize,
        new_value: f64,
    ) -> Result<(ForecastResult, Option<AdjustmentWarning>)> {
        let outcome = self.adjust_forecast_point(&forecast.values, index, new_value)?;
        Ok((forecast.with_values(history, outcome.values), outcome.warning))
    }

    /// Metrics for `history` followed by `values`
    pub fn compute_metrics(&self, history: &HistoricalSeries, values: &[f64]) -> ForecastMetrics {
        metrics::compute_metrics(history, values)
    }

    /// Every scenario in insertion order
    pub fn scenarios(&self) -> &[Scenario] {
        self.scenarios.list()
    }

    /// One scenario by id
    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// The active scenario, if any
    pub fn active_scenario(&self) -> Option<&Scenario> {
        self.scenarios.active()
    }

    /// Side-by-side summary of every scenario with a forecast
    pub fn scenario_comparison(&self) -> Vec<ScenarioSummary> {
        self.scenarios.comparison()
    }
}

/// Handle to a forecast running on the blocking pool
///
/// Resolves to the forecast, or to [`ForecastError::Cancelled`] when the flag
/// was raised before the result arrived.
#[derive(Debug)]
pub struct PendingForecast {
    task: JoinHandle<Result<ForecastResult>>,
    cancel: CancelFlag,
    finished: bool,
}

impl PendingForecast {
    /// Abandon the forecast; the handle then resolves to `Cancelled`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The flag shared with the running task
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }
}

impl Future for PendingForecast {
    type Output = Result<ForecastResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let joined = ready!(Pin::new(&mut self.task).poll(cx));
        self.finished = true;

        let outcome = match joined {
            Ok(result) => result.and_then(|forecast| discard_if_cancelled(forecast, &self.cancel)),
            Err(err) => {
                warn!(%err, "forecast task did not complete");
                Err(ForecastError::Cancelled)
            }
        };
        Poll::Ready(outcome)
    }
}

impl Drop for PendingForecast {
    fn drop(&mut self) {
        if !self.finished {
            debug!("pending forecast dropped, cancelling");
            self.cancel.cancel();
        }
    }
}

fn build_result(
    history: &HistoricalSeries,
    kind: ModelKind,
    periods: usize,
    settings: &ModelSettings,
    rng: &mut dyn RngCore,
) -> Result<ForecastResult> {
    let output = forecast_with(kind, history, periods, settings, rng)?;
    let metrics = metrics::compute_metrics(history, &output.values);

    info!(
        model = %kind,
        periods,
        confidence = output.confidence,
        growth_rate = metrics.growth_rate,
        "forecast generated"
    );

    Ok(ForecastResult {
        model: kind,
        periods,
        values: output.values,
        confidence: output.confidence,
        metrics,
        generated_at: Utc::now(),
        timestamps: history.future_timestamps(periods),
        paths: output.paths,
    })
}

fn discard_if_cancelled(result: ForecastResult, cancel: &CancelFlag) -> Result<ForecastResult> {
    if cancel.is_cancelled() {
        warn!(model = %result.model, "discarding forecast finished after cancellation");
        return Err(ForecastError::Cancelled);
    }
    Ok(result)
}
