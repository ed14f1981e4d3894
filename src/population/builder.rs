//! Population builder

use rand::Rng;

use crate::config::NeatConfig;
use crate::error::{NeatError, NeatResult};
use crate::genome::topology::Topology;
use crate::population::population::Population;

/// Builder for [`Population`]
///
/// Input count, output count and population size must be set; the
/// configuration defaults to [`NeatConfig::default`].
#[derive(Clone, Debug, Default)]
pub struct PopulationBuilder {
    input_count: Option<usize>,
    output_count: Option<usize>,
    population_size: Option<usize>,
    config: NeatConfig,
}

impl PopulationBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of input nodes
    pub fn input_count(mut self, count: usize) -> Self {
        self.input_count = Some(count);
        self
    }

    /// Set the number of output nodes
    pub fn output_count(mut self, count: usize) -> Self {
        self.output_count = Some(count);
        self
    }

    /// Set the number of genomes
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set the engine configuration
    pub fn config(mut self, config: NeatConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the population, drawing initial weights from `rng`
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> NeatResult<Population> {
        let input_count = self.input_count.ok_or_else(|| {
            NeatError::Configuration("Input count must be specified".to_string())
        })?;
        let output_count = self.output_count.ok_or_else(|| {
            NeatError::Configuration("Output count must be specified".to_string())
        })?;
        let population_size = self.population_size.ok_or_else(|| {
            NeatError::Configuration("Population size must be specified".to_string())
        })?;

        Population::with_config(
            Topology::new(input_count, output_count),
            population_size,
            self.config,
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builder_builds() {
        let mut rng = StdRng::seed_from_u64(42);
        let pop = Population::builder()
            .input_count(3)
            .output_count(2)
            .population_size(8)
            .config(NeatConfig::new().with_breed_mutation_chance(0.9))
            .build(&mut rng)
            .unwrap();

        assert_eq!(pop.input_count(), 3);
        assert_eq!(pop.output_count(), 2);
        assert_eq!(pop.len(), 8);
        assert_eq!(pop.config().breed_mutation_chance, 0.9);
    }

    #[test]
    fn test_builder_missing_field() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = PopulationBuilder::new()
            .input_count(2)
            .population_size(4)
            .build(&mut rng);
        assert!(matches!(result, Err(NeatError::Configuration(_))));
    }

    #[test]
    fn test_builder_matches_new() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let built = PopulationBuilder::new()
            .input_count(2)
            .output_count(1)
            .population_size(5)
            .build(&mut a)
            .unwrap();
        let direct = Population::new(2, 1, 5, &mut b).unwrap();
        assert_eq!(built.genomes(), direct.genomes());
    }
}
