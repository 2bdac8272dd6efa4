//! Engine configuration
//!
//! The serializable part of an engine setup. Operators, decoders and
//! problems are values supplied to the builder; everything numeric lives
//! here so runs can be described in JSON.

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};

/// Configuration for an [`Engine`](super::Engine)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size of the initial population
    pub population_size: usize,
    /// Maximum number of fitness evaluations for the whole run
    pub max_evaluations: Option<usize>,
    /// Maximum number of generations yielded
    pub max_generations: Option<usize>,
    /// Seed of the run's random generator
    pub seed: u64,
    /// Fitness assigned to individuals whose every trial failed
    ///
    /// Without it such individuals end the run with an error.
    pub unevaluable_fitness: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_evaluations: None,
            max_generations: None,
            seed: 0,
            unevaluable_fitness: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> EvoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a finite run
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.max_evaluations.is_none() && self.max_generations.is_none() {
            return Err(EvolutionError::Configuration(
                "Either max_evaluations or max_generations must be specified".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"max_evaluations": 500, "seed": 7}"#).unwrap();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_evaluations, Some(500));
        assert_eq!(config.max_generations, None);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_from_json_requires_budget() {
        let err = EngineConfig::from_json(r#"{"population_size": 10}"#).unwrap_err();
        assert!(matches!(err, EvolutionError::Configuration(_)));
    }

    #[test]
    fn test_from_json_rejects_bad_syntax() {
        let err = EngineConfig::from_json("{population_size: 10").unwrap_err();
        assert!(matches!(err, EvolutionError::Serialization(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig {
            population_size: 20,
            max_generations: Some(5),
            unevaluable_fitness: Some(-1.0),
            ..EngineConfig::default()
        };
        let parsed = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_empty_population() {
        let config = EngineConfig {
            population_size: 0,
            max_generations: Some(1),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
