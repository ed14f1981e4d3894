//! Mutation operators
//!
//! Each mutation copies the donor into the child slot and then applies
//! exactly one of five changes, picked by relative weight:
//!
//! | kind          | default share | effect                                      |
//! |---------------|---------------|---------------------------------------------|
//! | add node      | 0.02          | split one edge through a new hidden node    |
//! | weight adjust | 0.4           | add `U[-1, 1]` to one matrix cell           |
//! | weight set    | 0.1           | replace one matrix cell with `U[-1, 1]`     |
//! | bias adjust   | 0.3           | add `U[-1, 1]` to one node bias             |
//! | bias set      | 0.1           | replace one node bias with `U[-1, 1]`       |

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{NeatError, NeatResult};
use crate::genome::genome::Genome;
use crate::operators::traits::MutationOperator;
use crate::random;

/// The change applied by one mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Split an edge through a new hidden node
    AddNode,
    /// Perturb one edge weight
    WeightAdjust,
    /// Replace one edge weight
    WeightSet,
    /// Perturb one node bias
    BiasAdjust,
    /// Replace one node bias
    BiasSet,
}

/// Relative shares of the five mutation kinds
///
/// The shares are not independent probabilities: one uniform draw over their
/// sum selects exactly one kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationRates {
    /// Share of add-node mutations
    pub add_node: f32,
    /// Share of weight-adjust mutations
    pub weight_adjust: f32,
    /// Share of weight-set mutations
    pub weight_set: f32,
    /// Share of bias-adjust mutations
    pub bias_adjust: f32,
    /// Share of bias-set mutations
    pub bias_set: f32,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            add_node: 0.02,
            weight_adjust: 0.4,
            weight_set: 0.1,
            bias_adjust: 0.3,
            bias_set: 0.1,
        }
    }
}

impl MutationRates {
    /// Sum of all shares
    pub fn total(&self) -> f32 {
        self.add_node + self.weight_adjust + self.weight_set + self.bias_adjust + self.bias_set
    }

    /// Map a draw in `[0, total]` to a mutation kind. Each kind owns the
    /// interval ending at its cumulative share, upper bound included.
    pub fn choose(&self, draw: f32) -> MutationKind {
        let mut bound = self.add_node;
        if draw <= bound {
            return MutationKind::AddNode;
        }
        bound += self.weight_adjust;
        if draw <= bound {
            return MutationKind::WeightAdjust;
        }
        bound += self.weight_set;
        if draw <= bound {
            return MutationKind::WeightSet;
        }
        bound += self.bias_adjust;
        if draw <= bound {
            return MutationKind::BiasAdjust;
        }
        MutationKind::BiasSet
    }

    /// Draw a mutation kind
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MutationKind {
        self.choose(random::uniform(rng) * self.total())
    }

    /// Check that all shares are finite, non-negative and not all zero
    pub fn validate(&self) -> NeatResult<()> {
        let shares = [
            self.add_node,
            self.weight_adjust,
            self.weight_set,
            self.bias_adjust,
            self.bias_set,
        ];
        if shares.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(NeatError::Configuration(
                "mutation shares must be finite and non-negative".to_string(),
            ));
        }
        if self.total() <= 0.0 {
            return Err(NeatError::Configuration(
                "at least one mutation share must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structural mutation over weights, biases and hidden nodes
#[derive(Clone, Debug, Default)]
pub struct StructuralMutation {
    /// Relative shares of the mutation kinds
    pub rates: MutationRates,
}

impl StructuralMutation {
    /// Create a new structural mutation with the given shares
    pub fn new(rates: MutationRates) -> Self {
        Self { rates }
    }

    /// Overwrite `child` with `donor` and apply a specific mutation kind
    pub fn apply<R: Rng + ?Sized>(
        &self,
        kind: MutationKind,
        donor: &Genome,
        child: &mut Genome,
        rng: &mut R,
    ) {
        let n = donor.node_count();
        child.copy_from(donor, usize::from(kind == MutationKind::AddNode));
        match kind {
            MutationKind::AddNode => add_node(child, n, rng),
            MutationKind::WeightAdjust => {
                let cell = random::index(rng, n * n);
                child.edges_mut().as_mut_slice()[cell] += random::signed_unit(rng);
            }
            MutationKind::WeightSet => {
                let cell = random::index(rng, n * n);
                child.edges_mut().as_mut_slice()[cell] = random::signed_unit(rng);
            }
            MutationKind::BiasAdjust => {
                let node = random::index(rng, n);
                let bias = child.bias(node) + random::signed_unit(rng);
                child.set_bias(node, bias);
            }
            MutationKind::BiasSet => {
                let node = random::index(rng, n);
                child.set_bias(node, random::signed_unit(rng));
            }
        }
    }
}

/// Split a random edge of the first `donor_nodes` nodes through the new node
/// at index `donor_nodes`. A dormant (zero) edge gets a fresh weight first.
fn add_node<R: Rng + ?Sized>(child: &mut Genome, donor_nodes: usize, rng: &mut R) {
    let new_node = donor_nodes;
    let flat = random::index(rng, donor_nodes * donor_nodes);
    let (src, dst) = (flat / donor_nodes, flat % donor_nodes);

    let mut weight = child.weight(src, dst);
    if weight == 0.0 {
        weight = random::signed_unit(rng);
    }
    child.set_weight(src, new_node, 1.0);
    child.set_weight(new_node, dst, weight);
    child.set_weight(src, dst, 0.0);
    child.set_bias(new_node, 0.0);

    trace!(src, dst, new_node, weight, "split edge through new node");
}

impl MutationOperator for StructuralMutation {
    fn mutate_into<R: Rng>(&self, donor: &Genome, child: &mut Genome, rng: &mut R) -> MutationKind {
        let kind = self.rates.sample(rng);
        self.apply(kind, donor, child, rng);
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::topology::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(seed: u64) -> (StdRng, Genome, Genome) {
        let mut rng = StdRng::seed_from_u64(seed);
        let topology = Topology::new(2, 2);
        let donor = Genome::minimal(topology, &mut rng);
        let child = Genome::minimal(topology, &mut rng);
        (rng, donor, child)
    }

    fn differing_cells(a: &Genome, b: &Genome) -> usize {
        a.edges()
            .as_slice()
            .iter()
            .zip(b.edges().as_slice())
            .filter(|(x, y)| x != y)
            .count()
    }

    #[test]
    fn test_default_rates() {
        let rates = MutationRates::default();
        assert!((rates.total() - 0.92).abs() < 1e-6);
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_choose_boundaries() {
        let rates = MutationRates::default();
        assert_eq!(rates.choose(0.0), MutationKind::AddNode);
        assert_eq!(rates.choose(0.02), MutationKind::AddNode);
        assert_eq!(rates.choose(0.03), MutationKind::WeightAdjust);
        assert_eq!(rates.choose(0.41), MutationKind::WeightAdjust);
        assert_eq!(rates.choose(0.45), MutationKind::WeightSet);
        assert_eq!(rates.choose(0.6), MutationKind::BiasAdjust);
        assert_eq!(rates.choose(0.9), MutationKind::BiasSet);
        assert_eq!(rates.choose(rates.total()), MutationKind::BiasSet);
    }

    #[test]
    fn test_validate_rejects_bad_rates() {
        let negative = MutationRates {
            weight_set: -0.1,
            ..MutationRates::default()
        };
        assert!(negative.validate().is_err());

        let zero = MutationRates {
            add_node: 0.0,
            weight_adjust: 0.0,
            weight_set: 0.0,
            bias_adjust: 0.0,
            bias_set: 0.0,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_sample_respects_single_share() {
        let mut rng = StdRng::seed_from_u64(3);
        let only_bias = MutationRates {
            add_node: 0.0,
            weight_adjust: 0.0,
            weight_set: 0.0,
            bias_adjust: 0.0,
            bias_set: 1.0,
        };
        for _ in 0..100 {
            // A draw of exactly 0.0 lands on the first zero-width share
            let kind = only_bias.sample(&mut rng);
            assert!(matches!(kind, MutationKind::BiasSet | MutationKind::AddNode));
        }
    }

    #[test]
    fn test_weight_adjust_changes_one_cell() {
        let (mut rng, donor, mut child) = setup(10);
        let mutation = StructuralMutation::default();
        mutation.apply(MutationKind::WeightAdjust, &donor, &mut child, &mut rng);

        assert_eq!(child.node_count(), donor.node_count());
        assert_eq!(child.nodes(), donor.nodes());
        assert!(differing_cells(&donor, &child) <= 1);
    }

    #[test]
    fn test_weight_set_in_range() {
        let (mut rng, donor, mut child) = setup(11);
        let mutation = StructuralMutation::default();
        mutation.apply(MutationKind::WeightSet, &donor, &mut child, &mut rng);

        assert!(differing_cells(&donor, &child) <= 1);
        for (a, b) in donor.edges().as_slice().iter().zip(child.edges().as_slice()) {
            if a != b {
                assert!((-1.0..=1.0).contains(b));
            }
        }
    }

    #[test]
    fn test_bias_mutations_touch_one_node() {
        for kind in [MutationKind::BiasAdjust, MutationKind::BiasSet] {
            let (mut rng, donor, mut child) = setup(12);
            StructuralMutation::default().apply(kind, &donor, &mut child, &mut rng);

            assert_eq!(child.edges(), donor.edges());
            let changed = donor
                .nodes()
                .iter()
                .zip(child.nodes())
                .filter(|(a, b)| a != b)
                .count();
            assert!(changed <= 1);
            assert!(child.nodes().iter().all(|n| (-1.0..=1.0).contains(&n.bias)));
        }
    }

    #[test]
    fn test_add_node_splits_edge() {
        let (mut rng, donor, mut child) = setup(13);
        let n = donor.node_count();
        StructuralMutation::default().apply(MutationKind::AddNode, &donor, &mut child, &mut rng);

        assert_eq!(child.node_count(), n + 1);
        assert_eq!(child.bias(n), 0.0);

        // Exactly one source feeds the new node with weight 1.0
        let feeders: Vec<usize> = (0..n).filter(|&s| child.weight(s, n) != 0.0).collect();
        assert_eq!(feeders.len(), 1);
        let src = feeders[0];
        assert_eq!(child.weight(src, n), 1.0);

        // Exactly one destination is fed by the new node
        let targets: Vec<usize> = (0..n).filter(|&d| child.weight(n, d) != 0.0).collect();
        assert_eq!(targets.len(), 1);
        let dst = targets[0];

        // The split edge is gone and its weight moved behind the new node
        assert_eq!(child.weight(src, dst), 0.0);
        let original = donor.weight(src, dst);
        if original != 0.0 {
            assert_eq!(child.weight(n, dst), original);
        } else {
            assert!((-1.0..=1.0).contains(&child.weight(n, dst)));
        }

        // Every other old cell is unchanged
        for s in 0..n {
            for d in 0..n {
                if (s, d) != (src, dst) {
                    assert_eq!(child.weight(s, d), donor.weight(s, d));
                }
            }
        }
    }

    #[test]
    fn test_mutate_into_leaves_donor_untouched() {
        let (mut rng, donor, mut child) = setup(14);
        let snapshot = donor.clone();
        let mutation = StructuralMutation::default();
        for _ in 0..50 {
            mutation.mutate_into(&donor, &mut child, &mut rng);
        }
        assert_eq!(donor, snapshot);
    }
}
