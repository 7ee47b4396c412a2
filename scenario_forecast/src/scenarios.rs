//! Named scenarios that reweight a historical series
//!
//! A scenario is a parameter set (growth, seasonality, volatility) applied to
//! the history before forecasting. The manager keeps scenarios in insertion
//! order and guarantees that at most one of them is active at any time.

use crate::data::HistoricalSeries;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastResult;
use chrono::{DateTime, Utc};
use forecast_math::centered_uniform;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::info;
use uuid::Uuid;

/// Id of the scenario driven by the manual adjustment sliders
pub const MANUAL_SCENARIO_ID: &str = "manual-adjustment";

const DEFAULT_ICON: &str = "📊";
const MANUAL_ICON: &str = "🎛️";

/// Factors applied to a history before forecasting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    /// Yearly growth multiplier; 1.0 means no growth adjustment
    pub growth_factor: f64,
    /// Amplitude of the injected yearly wave; 0.0 removes it
    pub seasonality_factor: f64,
    /// Scale of the injected noise; 0.0 removes it
    pub volatility_factor: f64,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            growth_factor: 1.0,
            seasonality_factor: 0.0,
            volatility_factor: 0.0,
        }
    }
}

impl ScenarioParameters {
    /// Create validated parameters
    pub fn new(growth_factor: f64, seasonality_factor: f64, volatility_factor: f64) -> Result<Self> {
        let params = Self {
            growth_factor,
            seasonality_factor,
            volatility_factor,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that growth is positive and the other factors are non-negative
    pub fn validate(&self) -> Result<()> {
        if !self.growth_factor.is_finite() || self.growth_factor <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Growth factor must be positive, got {}",
                self.growth_factor
            )));
        }
        if !self.seasonality_factor.is_finite() || self.seasonality_factor < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Seasonality factor must be non-negative, got {}",
                self.seasonality_factor
            )));
        }
        if !self.volatility_factor.is_finite() || self.volatility_factor < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Volatility factor must be non-negative, got {}",
                self.volatility_factor
            )));
        }
        Ok(())
    }
}

/// A named parameter set and its latest forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub parameters: ScenarioParameters,
    pub description: String,
    pub forecast: Option<ForecastResult>,
    active: bool,
    pub created_at: DateTime<Utc>,
}

impl Scenario {
    /// Create an inactive scenario without a forecast
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        parameters: ScenarioParameters,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: DEFAULT_ICON.to_string(),
            parameters,
            description: description.into(),
            forecast: None,
            active: false,
            created_at: Utc::now(),
        }
    }

    /// Replace the display icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Whether this is the active scenario
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Growth adjustment as a signed percentage, e.g. 1.5 -> +50%
    pub fn growth_percent(&self) -> f64 {
        (self.parameters.growth_factor - 1.0) * 100.0
    }
}

/// Built-in scenario definition
#[derive(Debug, Clone, Copy)]
pub struct ScenarioTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub parameters: ScenarioParameters,
    pub description: &'static str,
}

impl ScenarioTemplate {
    /// Instantiate the template as an inactive scenario
    pub fn instantiate(&self) -> Scenario {
        Scenario::new(self.key, self.name, self.parameters, self.description).with_icon(self.icon)
    }
}

const fn factors(growth: f64, seasonality: f64, volatility: f64) -> ScenarioParameters {
    ScenarioParameters {
        growth_factor: growth,
        seasonality_factor: seasonality,
        volatility_factor: volatility,
    }
}

/// Scenarios available out of the box
pub const TEMPLATES: [ScenarioTemplate; 5] = [
    ScenarioTemplate {
        key: "optimistic",
        name: "Optimistic Growth",
        icon: "📈",
        parameters: factors(1.5, 1.2, 0.8),
        description: "High growth scenario with reduced volatility",
    },
    ScenarioTemplate {
        key: "pessimistic",
        name: "Conservative Forecast",
        icon: "📉",
        parameters: factors(0.7, 0.8, 1.3),
        description: "Slower growth with increased uncertainty",
    },
    ScenarioTemplate {
        key: "seasonal",
        name: "Seasonal Focus",
        icon: "🎭",
        parameters: factors(1.0, 1.8, 1.0),
        description: "Strong seasonal patterns maintained",
    },
    ScenarioTemplate {
        key: "disruption",
        name: "Market Disruption",
        icon: "⚡",
        parameters: factors(0.5, 0.6, 2.0),
        description: "High volatility disruption scenario",
    },
    ScenarioTemplate {
        key: "recovery",
        name: "Post-Crisis Recovery",
        icon: "🔄",
        parameters: factors(1.8, 1.1, 1.4),
        description: "Strong recovery with initial volatility",
    },
];

/// Row of the scenario comparison view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub confidence: f64,
    pub growth_percent: f64,
    pub final_value: f64,
    pub active: bool,
}

/// Reweight `history` by a scenario's parameters
///
/// Position `i` becomes
/// `v * growth^(i/12) * (1 + sin(i*pi/6) * seasonality + noise)`, floored at
/// zero, where `noise` is uniform in `+/- volatility * 0.05`. With zero
/// volatility the generator is not touched and the result is deterministic.
pub fn apply_parameters(
    history: &HistoricalSeries,
    params: &ScenarioParameters,
    rng: &mut dyn RngCore,
) -> Result<HistoricalSeries> {
    params.validate()?;

    let adjusted: Vec<f64> = history
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let position = i as f64;
            let seasonal_effect = (position * PI / 6.0).sin() * params.seasonality_factor;
            let growth_effect = params.growth_factor.powf(position / 12.0);
            let noise = if params.volatility_factor > 0.0 {
                centered_uniform(&mut *rng) * params.volatility_factor * 0.1
            } else {
                0.0
            };
            (point.value * growth_effect * (1.0 + seasonal_effect + noise)).max(0.0)
        })
        .collect();

    if let Some(position) = adjusted.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidParameter(format!(
            "Growth factor {} overflows the series at position {}",
            params.growth_factor, position
        )));
    }

    history.with_values(&adjusted)
}

/// Owner of all scenarios
#[derive(Debug, Clone, Default)]
pub struct ScenarioManager {
    scenarios: Vec<Scenario>,
}

impl ScenarioManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager holding every template, none active
    pub fn with_templates() -> Self {
        Self {
            scenarios: TEMPLATES.iter().map(ScenarioTemplate::instantiate).collect(),
        }
    }

    /// Register a scenario; its active flag is honoured
    pub fn insert(&mut self, scenario: Scenario) -> Result<&Scenario> {
        scenario.parameters.validate()?;
        if self.position(&scenario.id).is_some() {
            return Err(ForecastError::DuplicateScenario(scenario.id));
        }

        let activate = scenario.active;
        let id = scenario.id.clone();
        info!(id = %id, name = %scenario.name, "scenario created");
        self.scenarios.push(scenario);
        if activate {
            self.activate(&id)?;
        }

        let last = self.scenarios.len() - 1;
        Ok(&self.scenarios[last])
    }

    /// Create an ad-hoc scenario with a generated id
    pub fn create(
        &mut self,
        name: &str,
        parameters: ScenarioParameters,
        description: &str,
    ) -> Result<&Scenario> {
        let id = format!("custom-{}", Uuid::new_v4());
        self.insert(Scenario::new(id, name, parameters, description))
    }

    /// Look up a scenario
    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Every scenario in insertion order
    pub fn list(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether no scenario is registered
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// The active scenario, if any
    pub fn active(&self) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.active)
    }

    /// Make `id` the only active scenario
    pub fn activate(&mut self, id: &str) -> Result<()> {
        self.require(id)?;
        for scenario in &mut self.scenarios {
            scenario.active = scenario.id == id;
        }
        info!(id, "scenario activated");
        Ok(())
    }

    /// Clear the active flag of `id`
    pub fn deactivate(&mut self, id: &str) -> Result<()> {
        let index = self.require(id)?;
        self.scenarios[index].active = false;
        info!(id, "scenario deactivated");
        Ok(())
    }

    /// Flip the active flag of `id`; returns the new state
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let index = self.require(id)?;
        if self.scenarios[index].active {
            self.deactivate(id)?;
            Ok(false)
        } else {
            self.activate(id)?;
            Ok(true)
        }
    }

    /// Remove `id`; if it was active, no scenario is active afterwards
    pub fn remove(&mut self, id: &str) -> Result<Scenario> {
        let index = self.require(id)?;
        let removed = self.scenarios.remove(index);
        info!(id, was_active = removed.active, "scenario removed");
        Ok(removed)
    }

    /// Store a freshly computed forecast on `id`
    pub fn set_forecast(&mut self, id: &str, forecast: ForecastResult) -> Result<()> {
        let index = self.require(id)?;
        self.scenarios[index].forecast = Some(forecast);
        Ok(())
    }

    /// Upsert the slider-driven scenario and make it the active one
    pub fn apply_manual_adjustment(&mut self, parameters: ScenarioParameters) -> Result<&Scenario> {
        parameters.validate()?;

        match self.position(MANUAL_SCENARIO_ID) {
            Some(index) => {
                let scenario = &mut self.scenarios[index];
                scenario.parameters = parameters;
                scenario.forecast = None;
            }
            None => {
                let scenario = Scenario::new(
                    MANUAL_SCENARIO_ID,
                    "Manual Adjustment",
                    parameters,
                    "Parameters set by hand",
                )
                .with_icon(MANUAL_ICON);
                self.insert(scenario)?;
            }
        }

        self.activate(MANUAL_SCENARIO_ID)?;
        let index = self.require(MANUAL_SCENARIO_ID)?;
        Ok(&self.scenarios[index])
    }

    /// Summaries of every scenario that has a forecast
    pub fn comparison(&self) -> Vec<ScenarioSummary> {
        self.scenarios
            .iter()
            .filter_map(|s| {
                let forecast = s.forecast.as_ref()?;
                Some(ScenarioSummary {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    confidence: forecast.confidence,
                    growth_percent: s.growth_percent(),
                    final_value: forecast.final_value().unwrap_or(0.0),
                    active: s.active,
                })
            })
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.id == id)
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| ForecastError::ScenarioNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parameter_validation() {
        assert!(ScenarioParameters::new(1.0, 0.0, 0.0).is_ok());
        assert!(ScenarioParameters::new(0.0, 0.0, 0.0).is_err());
        assert!(ScenarioParameters::new(1.0, -0.1, 0.0).is_err());
        assert!(ScenarioParameters::new(1.0, 0.0, -1.0).is_err());
        assert!(ScenarioParameters::new(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_templates_start_inactive() {
        let manager = ScenarioManager::with_templates();
        assert_eq!(manager.len(), 5);
        assert!(manager.active().is_none());

        let ids: Vec<&str> = manager.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["optimistic", "pessimistic", "seasonal", "disruption", "recovery"]
        );
    }

    #[test]
    fn test_identity_parameters_leave_history_unchanged() {
        let history = HistoricalSeries::from_values(&[10.0, 20.0, 30.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let adjusted = apply_parameters(&history, &ScenarioParameters::default(), &mut rng).unwrap();
        assert_eq!(adjusted, history);
    }

    #[test]
    fn test_growth_compounds_yearly() {
        let history = HistoricalSeries::from_values(&[100.0; 13]).unwrap();
        let params = ScenarioParameters::new(2.0, 0.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let adjusted = apply_parameters(&history, &params, &mut rng).unwrap().values();
        assert_relative_eq!(adjusted[0], 100.0);
        assert_relative_eq!(adjusted[6], 100.0 * 2f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(adjusted[12], 200.0, max_relative = 1e-12);
    }

    #[test]
    fn test_seasonal_wave_is_floored() {
        let history = HistoricalSeries::from_values(&[100.0; 12]).unwrap();
        let params = ScenarioParameters::new(1.0, 2.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let adjusted = apply_parameters(&history, &params, &mut rng).unwrap().values();
        // sin(3*pi/6) = 1 -> 100 * (1 + 2)
        assert_relative_eq!(adjusted[3], 300.0, max_relative = 1e-12);
        // sin(9*pi/6) = -1 -> 100 * (1 - 2) floored
        assert_eq!(adjusted[9], 0.0);
    }

    #[test]
    fn test_volatility_noise_is_bounded() {
        let history = HistoricalSeries::from_values(&[100.0; 50]).unwrap();
        let params = ScenarioParameters::new(1.0, 0.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let adjusted = apply_parameters(&history, &params, &mut rng).unwrap().values();
        assert!(adjusted.iter().all(|&v| (95.0..=105.0).contains(&v)));
        assert!(adjusted.iter().any(|&v| v != 100.0));
    }

    #[test]
    fn test_growth_overflow_names_the_factor() {
        let history = HistoricalSeries::from_values(&[100.0; 1000]).unwrap();
        let params = ScenarioParameters::new(1e6, 0.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        match apply_parameters(&history, &params, &mut rng) {
            Err(ForecastError::InvalidParameter(msg)) => {
                assert!(msg.contains("Growth factor"), "{}", msg);
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut manager = ScenarioManager::with_templates();
        let result = manager.insert(TEMPLATES[0].instantiate());
        assert_eq!(
            result.unwrap_err(),
            ForecastError::DuplicateScenario("optimistic".to_string())
        );
    }

    #[test]
    fn test_toggle() {
        let mut manager = ScenarioManager::with_templates();

        assert!(manager.toggle("seasonal").unwrap());
        assert_eq!(manager.active().unwrap().id, "seasonal");

        assert!(manager.toggle("recovery").unwrap());
        assert_eq!(manager.active().unwrap().id, "recovery");

        assert!(!manager.toggle("recovery").unwrap());
        assert!(manager.active().is_none());
    }

    #[test]
    fn test_manual_adjustment_upserts() {
        let mut manager = ScenarioManager::with_templates();
        manager.activate("optimistic").unwrap();

        let first = ScenarioParameters::new(1.2, 1.0, 1.0).unwrap();
        manager.apply_manual_adjustment(first).unwrap();
        let second = ScenarioParameters::new(0.8, 0.5, 0.2).unwrap();
        let scenario = manager.apply_manual_adjustment(second).unwrap();

        assert_eq!(scenario.id, MANUAL_SCENARIO_ID);
        assert_eq!(scenario.parameters, second);
        assert_eq!(manager.len(), 6);
        assert_eq!(manager.active().unwrap().id, MANUAL_SCENARIO_ID);
        assert!(!manager.get("optimistic").unwrap().is_active());
    }

    #[test]
    fn test_growth_percent() {
        let scenario = TEMPLATES[0].instantiate();
        assert_relative_eq!(scenario.growth_percent(), 50.0);
    }
}
