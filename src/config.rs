//! Engine configuration
//!
//! The breeding constants are tunable, and the defaults reproduce the
//! classic fast-neat behaviour.

use serde::{Deserialize, Serialize};

use crate::error::{NeatError, NeatResult};
use crate::operators::mutation::MutationRates;

/// Configuration for the population controller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeatConfig {
    /// Probability that an offspring is a mutated copy rather than a crossover
    pub breed_mutation_chance: f32,
    /// Relative shares of the mutation kinds
    pub mutation: MutationRates,
    /// Generations whose average score moves less than this are stale
    pub stale_threshold: f32,
    /// Average score assumed before the first generation
    pub initial_last_average: f32,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            breed_mutation_chance: 0.5,
            mutation: MutationRates::default(),
            stale_threshold: 1e-6,
            initial_last_average: -1e8,
        }
    }
}

impl NeatConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mutation-versus-crossover probability
    pub fn with_breed_mutation_chance(mut self, chance: f32) -> Self {
        self.breed_mutation_chance = chance;
        self
    }

    /// Set the mutation shares
    pub fn with_mutation_rates(mut self, rates: MutationRates) -> Self {
        self.mutation = rates;
        self
    }

    /// Set the stagnation threshold
    pub fn with_stale_threshold(mut self, threshold: f32) -> Self {
        self.stale_threshold = threshold;
        self
    }

    /// Check every value is usable
    pub fn validate(&self) -> NeatResult<()> {
        if !(0.0..=1.0).contains(&self.breed_mutation_chance) {
            return Err(NeatError::Configuration(format!(
                "breed_mutation_chance must be in [0, 1], got {}",
                self.breed_mutation_chance
            )));
        }
        if !self.stale_threshold.is_finite() || self.stale_threshold < 0.0 {
            return Err(NeatError::Configuration(format!(
                "stale_threshold must be finite and non-negative, got {}",
                self.stale_threshold
            )));
        }
        if !self.initial_last_average.is_finite() {
            return Err(NeatError::Configuration(
                "initial_last_average must be finite".to_string(),
            ));
        }
        self.mutation.validate()
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> NeatResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| NeatError::Configuration(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as pretty JSON
    pub fn to_json_string(&self) -> NeatResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NeatError::Configuration(format!("cannot encode config: {}", e)))
    }
}
