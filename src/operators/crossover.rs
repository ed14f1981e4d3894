//! Crossover operators
//!
//! This module provides the per-gene uniform crossover used between genomes
//! that may have different node counts.

use rand::Rng;

use crate::genome::genome::Genome;
use crate::operators::traits::CrossoverOperator;
use crate::random;

/// Uniform crossover matched by index
///
/// The child takes the first parent's node count. Every matrix cell and node
/// bias that also exists in the second parent comes from either parent with
/// equal probability; everything else comes from the first parent. Genes are
/// aligned purely by index, so connections that mean different things in
/// differently-shaped parents can be blended.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformCrossover;

impl UniformCrossover {
    /// Create a new uniform crossover
    pub fn new() -> Self {
        Self
    }
}

impl CrossoverOperator for UniformCrossover {
    fn crossover_into<R: Rng>(
        &self,
        first: &Genome,
        second: &Genome,
        child: &mut Genome,
        rng: &mut R,
    ) {
        let n = first.node_count();
        let shared = second.node_count();
        child.reshape(n);

        for i in 0..n {
            for j in 0..n {
                let weight = if i < shared && j < shared && random::coin(rng) {
                    second.weight(i, j)
                } else {
                    first.weight(i, j)
                };
                child.set_weight(i, j, weight);
            }
            let bias = if i < shared && random::coin(rng) {
                second.bias(i)
            } else {
                first.bias(i)
            };
            child.set_bias(i, bias);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::genome::Node;
    use crate::genome::matrix::EdgeMatrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled(node_count: usize, weight: f32, bias: f32) -> Genome {
        Genome::from_parts(
            vec![Node { bias }; node_count],
            EdgeMatrix::from_weights(node_count, vec![weight; node_count * node_count]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_child_takes_first_parent_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = filled(4, 1.0, 1.0);
        let second = filled(3, 2.0, 2.0);
        let mut child = filled(6, 0.0, 0.0);

        UniformCrossover::new().crossover_into(&first, &second, &mut child, &mut rng);
        assert_eq!(child.node_count(), 4);
        assert_eq!(child.edges().len(), 16);
    }

    #[test]
    fn test_genes_come_from_a_parent() {
        let mut rng = StdRng::seed_from_u64(2);
        let first = filled(4, 1.0, 1.0);
        let second = filled(3, 2.0, 2.0);
        let mut child = filled(4, 0.0, 0.0);

        UniformCrossover.crossover_into(&first, &second, &mut child, &mut rng);
        for i in 0..4 {
            for j in 0..4 {
                let w = child.weight(i, j);
                if i < 3 && j < 3 {
                    assert!(w == 1.0 || w == 2.0);
                } else {
                    assert_eq!(w, 1.0, "cell ({}, {}) outside the second parent", i, j);
                }
            }
            let b = child.bias(i);
            if i < 3 {
                assert!(b == 1.0 || b == 2.0);
            } else {
                assert_eq!(b, 1.0);
            }
        }
    }

    #[test]
    fn test_both_parents_contribute() {
        let mut rng = StdRng::seed_from_u64(3);
        let first = filled(5, 1.0, 0.0);
        let second = filled(5, 2.0, 0.0);
        let mut child = filled(5, 0.0, 0.0);

        UniformCrossover.crossover_into(&first, &second, &mut child, &mut rng);
        let from_first = child.edges().as_slice().iter().filter(|&&w| w == 1.0).count();
        let from_second = child.edges().as_slice().iter().filter(|&&w| w == 2.0).count();
        assert_eq!(from_first + from_second, 25);
        assert!(from_first > 0 && from_second > 0);
    }

    #[test]
    fn test_larger_second_parent_ignored_beyond_first() {
        let mut rng = StdRng::seed_from_u64(4);
        let first = filled(2, 1.0, 1.0);
        let second = filled(5, 2.0, 2.0);
        let mut child = filled(2, 0.0, 0.0);

        UniformCrossover.crossover_into(&first, &second, &mut child, &mut rng);
        assert_eq!(child.node_count(), 2);
    }
}
