//! Engine configuration

use crate::adjustment::DECAY_RATE;
use crate::error::{ForecastError, Result};
use crate::models::monte_carlo::DEFAULT_SIMULATIONS;
use crate::models::{ModelKind, ModelSettings};
use serde::{Deserialize, Serialize};

/// Defaults used by [`crate::engine::ForecastEngine`]
///
/// Missing fields take their default when deserialized, so a partial JSON
/// document such as `{"defaultPeriods": 6}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Model used when no scenario forecast is available
    pub default_model: ModelKind,
    /// Horizon of default and scenario forecasts
    pub default_periods: usize,
    /// Model used to recompute scenario forecasts
    pub scenario_model: ModelKind,
    /// Monte Carlo path count
    pub monte_carlo_simulations: usize,
    /// Return every simulated path with Monte Carlo forecasts
    pub keep_simulation_paths: bool,
    /// Decay of manual adjustments per period
    pub decay_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_model: ModelKind::Linear,
            default_periods: 12,
            scenario_model: ModelKind::Seasonal,
            monte_carlo_simulations: DEFAULT_SIMULATIONS,
            keep_simulation_paths: false,
            decay_rate: DECAY_RATE,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no forecast can run with
    pub fn validate(&self) -> Result<()> {
        if self.default_periods == 0 {
            return Err(ForecastError::ConfigError(
                "defaultPeriods must be greater than zero".to_string(),
            ));
        }
        if self.monte_carlo_simulations == 0 {
            return Err(ForecastError::ConfigError(
                "monteCarloSimulations must be greater than zero".to_string(),
            ));
        }
        if !self.decay_rate.is_finite() || self.decay_rate <= 0.0 {
            return Err(ForecastError::ConfigError(format!(
                "decayRate must be positive, got {}",
                self.decay_rate
            )));
        }
        Ok(())
    }

    pub(crate) fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            simulations: self.monte_carlo_simulations,
            keep_paths: self.keep_simulation_paths,
            cancel: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_model, ModelKind::Linear);
        assert_eq!(config.scenario_model, ModelKind::Seasonal);
        assert_eq!(config.default_periods, 12);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            EngineConfig::from_json(r#"{"defaultPeriods": 6, "scenarioModel": "monteCarlo"}"#)
                .unwrap();
        assert_eq!(
            config,
            EngineConfig {
                default_periods: 6,
                scenario_model: ModelKind::MonteCarlo,
                ..EngineConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(ForecastError::ConfigError(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"defaultPeriods": 0}"#),
            Err(ForecastError::ConfigError(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"decayRate": -1.0}"#),
            Err(ForecastError::ConfigError(_))
        ));
    }
}
