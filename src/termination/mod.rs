//! Stopping rules for the evolution driver
//!
//! A criterion inspects the population after each update, together with the
//! best genome seen so far, and either names a reason to stop or lets the run
//! continue. Everything it can look at is engine state: the generation
//! counter, the [`UpdateReport`] of the last update and the genomes
//! themselves.

use crate::genome::genome::Genome;
use crate::population::population::{Population, UpdateReport};

/// What a criterion sees after each generation
#[derive(Clone, Copy, Debug)]
pub struct EvolutionState<'a> {
    /// Population right after its latest update
    pub population: &'a Population,
    /// Best genome of any generation in this run
    pub best: &'a Genome,
    /// Fitness evaluations performed in this run
    pub evaluations: usize,
}

impl<'a> EvolutionState<'a> {
    /// Completed generations, counted by the population
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// Summary of the update that produced this state
    pub fn report(&self) -> Option<&'a UpdateReport> {
        self.population.last_report()
    }

    /// Node count of the largest genome
    pub fn largest_genome(&self) -> usize {
        self.population
            .genomes()
            .iter()
            .map(Genome::node_count)
            .max()
            .unwrap_or(0)
    }
}

/// Decides when a run is over
pub trait TerminationCriterion: Send + Sync {
    /// The reason to stop now, or `None` to keep evolving
    fn check(&self, state: &EvolutionState) -> Option<String>;
}

/// Stop once the population has completed this many generations
#[derive(Clone, Copy, Debug)]
pub struct MaxGenerations(pub usize);

impl MaxGenerations {
    pub fn new(generations: usize) -> Self {
        Self(generations)
    }
}

impl TerminationCriterion for MaxGenerations {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        (state.generation() >= self.0).then(|| format!("generation {} reached", self.0))
    }
}

/// Stop after this many fitness evaluations in the current run
#[derive(Clone, Copy, Debug)]
pub struct MaxEvaluations(pub usize);

impl MaxEvaluations {
    pub fn new(evaluations: usize) -> Self {
        Self(evaluations)
    }
}

impl TerminationCriterion for MaxEvaluations {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        (state.evaluations >= self.0).then(|| format!("{} evaluations used", state.evaluations))
    }
}

/// Stop when the best genome scores at least `target`. A NaN score never
/// reaches a target.
#[derive(Clone, Copy, Debug)]
pub struct TargetFitness(pub f32);

impl TargetFitness {
    pub fn new(target: f32) -> Self {
        Self(target)
    }
}

impl TerminationCriterion for TargetFitness {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        let score = state.best.fitness();
        (score >= self.0).then(|| format!("fitness {} reached target {}", score, self.0))
    }
}

/// Stop after `n` consecutive stale generations, i.e. updates whose average
/// score moved less than the configured stale threshold. Each stale update
/// already breeds from a single elite, so a long streak means the forced
/// restarts are not escaping the plateau.
#[derive(Clone, Copy, Debug)]
pub struct StaleGenerations(pub usize);

impl StaleGenerations {
    pub fn new(generations: usize) -> Self {
        Self(generations)
    }
}

impl TerminationCriterion for StaleGenerations {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        let streak = state.report()?.stale_streak;
        (self.0 > 0 && streak >= self.0)
            .then(|| format!("average stale for {} generations", streak))
    }
}

/// Stop once the largest genome has reached `n` nodes
#[derive(Clone, Copy, Debug)]
pub struct NodeBudget(pub usize);

impl NodeBudget {
    pub fn new(nodes: usize) -> Self {
        Self(nodes)
    }
}

impl TerminationCriterion for NodeBudget {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        let largest = state.largest_genome();
        (largest >= self.0).then(|| format!("largest genome reached {} nodes", largest))
    }
}

/// Stops as soon as one criterion does, reporting the first in list order
pub struct AnyOf(Vec<Box<dyn TerminationCriterion>>);

impl AnyOf {
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self(criteria)
    }
}

impl TerminationCriterion for AnyOf {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        self.0.iter().find_map(|criterion| criterion.check(state))
    }
}

/// Stops only when every criterion does; never stops when empty
pub struct AllOf(Vec<Box<dyn TerminationCriterion>>);

impl AllOf {
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self(criteria)
    }
}

impl TerminationCriterion for AllOf {
    fn check(&self, state: &EvolutionState) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let reasons = self
            .0
            .iter()
            .map(|criterion| criterion.check(state))
            .collect::<Option<Vec<_>>>()?;
        Some(reasons.join("; "))
    }
}

pub mod prelude {
    pub use super::{
        AllOf, AnyOf, EvolutionState, MaxEvaluations, MaxGenerations, NodeBudget,
        StaleGenerations, TargetFitness, TerminationCriterion,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::topology::Topology;
    use crate::operators::mutation::{MutationKind, StructuralMutation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population_at(generation: usize) -> Population {
        let mut rng = StdRng::seed_from_u64(0);
        let pop = Population::new(2, 1, 4, &mut rng).unwrap();
        Population::from_parts(
            pop.topology(),
            pop.config().clone(),
            pop.genomes().to_vec(),
            None,
            generation,
        )
        .unwrap()
    }

    fn scored(fitness: f32) -> Genome {
        let mut genome = population_at(0).genomes()[0].clone();
        genome.set_fitness(fitness);
        genome
    }

    fn state<'a>(pop: &'a Population, best: &'a Genome, evaluations: usize) -> EvolutionState<'a> {
        EvolutionState {
            population: pop,
            best,
            evaluations,
        }
    }

    #[test]
    fn test_max_generations_reads_population_counter() {
        let best = scored(0.0);
        let criterion = MaxGenerations::new(30);

        assert_eq!(criterion.check(&state(&population_at(29), &best, 0)), None);
        assert_eq!(
            criterion.check(&state(&population_at(30), &best, 0)).as_deref(),
            Some("generation 30 reached")
        );
        assert!(criterion.check(&state(&population_at(45), &best, 0)).is_some());
    }

    #[test]
    fn test_max_evaluations() {
        let pop = population_at(0);
        let best = scored(0.0);
        let criterion = MaxEvaluations::new(40);

        assert!(criterion.check(&state(&pop, &best, 36)).is_none());
        assert_eq!(
            criterion.check(&state(&pop, &best, 40)).as_deref(),
            Some("40 evaluations used")
        );
    }

    #[test]
    fn test_target_fitness_uses_best_genome() {
        let pop = population_at(0);
        let criterion = TargetFitness::new(-0.1);

        assert!(criterion.check(&state(&pop, &scored(-0.2), 0)).is_none());
        assert!(criterion.check(&state(&pop, &scored(-0.1), 0)).is_some());
        assert!(criterion.check(&state(&pop, &scored(f32::NAN), 0)).is_none());
    }

    #[test]
    fn test_stale_generations_counts_streak() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pop = Population::new(2, 1, 6, &mut rng).unwrap();
        let best = scored(0.0);
        let criterion = StaleGenerations::new(2);
        assert!(criterion.check(&state(&pop, &best, 0)).is_none());

        let flat = |_: &Topology, _: &Genome| 0.5;
        let mut fired = Vec::new();
        for _ in 0..4 {
            pop.update(&flat, &mut rng);
            fired.push(criterion.check(&state(&pop, &best, 0)).is_some());
        }
        // First update sets the baseline, then the streak grows by one each time
        assert_eq!(fired, vec![false, false, true, true]);

        pop.update(&|_: &Topology, _: &Genome| 0.9, &mut rng);
        assert!(criterion.check(&state(&pop, &best, 0)).is_none());
        assert!(StaleGenerations::new(0).check(&state(&pop, &best, 0)).is_none());
    }

    #[test]
    fn test_node_budget_fires_when_reached() {
        let pop = population_at(0);
        let best = scored(0.0);
        assert!(NodeBudget::new(4).check(&state(&pop, &best, 0)).is_none());
        assert_eq!(
            NodeBudget::new(3).check(&state(&pop, &best, 0)).as_deref(),
            Some("largest genome reached 3 nodes")
        );

        let donor = pop.genomes()[0].clone();
        let mut grown = donor.clone();
        let mut rng = StdRng::seed_from_u64(1);
        StructuralMutation::default().apply(MutationKind::AddNode, &donor, &mut grown, &mut rng);
        let mut genomes = pop.genomes().to_vec();
        genomes[2] = grown;
        let bigger =
            Population::from_parts(pop.topology(), pop.config().clone(), genomes, None, 0).unwrap();

        assert_eq!(state(&bigger, &best, 0).largest_genome(), 4);
        assert!(NodeBudget::new(4).check(&state(&bigger, &best, 0)).is_some());
    }

    #[test]
    fn test_any_of_reports_first_firing() {
        let pop = population_at(10);
        let best = scored(-0.5);
        let criterion = AnyOf::new(vec![
            Box::new(TargetFitness::new(0.0)),
            Box::new(MaxGenerations::new(10)),
            Box::new(NodeBudget::new(3)),
        ]);

        assert_eq!(
            criterion.check(&state(&pop, &best, 0)).as_deref(),
            Some("generation 10 reached")
        );
        assert!(AnyOf::new(vec![]).check(&state(&pop, &best, 0)).is_none());
    }

    #[test]
    fn test_all_of_needs_every_criterion() {
        let best = scored(0.0);
        let criterion = AllOf::new(vec![
            Box::new(MaxGenerations::new(5)),
            Box::new(MaxEvaluations::new(20)),
        ]);

        assert!(criterion.check(&state(&population_at(5), &best, 10)).is_none());
        assert!(criterion.check(&state(&population_at(4), &best, 20)).is_none());
        assert_eq!(
            criterion.check(&state(&population_at(5), &best, 20)).as_deref(),
            Some("generation 5 reached; 20 evaluations used")
        );
        assert!(AllOf::new(vec![]).check(&state(&population_at(5), &best, 20)).is_none());
    }
}
