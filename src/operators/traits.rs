//! Operator traits
//!
//! Operators write their offspring into an existing population slot instead
//! of returning new genomes, so a generation reuses its storage.

use rand::Rng;

use crate::genome::genome::Genome;
use crate::operators::mutation::MutationKind;

/// Mutation operator trait
///
/// Copies a donor into the child slot and applies one random change to the
/// copy. The donor is never modified.
pub trait MutationOperator: Send + Sync {
    /// Overwrite `child` with a mutated copy of `donor`
    fn mutate_into<R: Rng>(&self, donor: &Genome, child: &mut Genome, rng: &mut R)
        -> MutationKind;
}

/// Crossover operator trait
///
/// Combines genetic material from two parents into the child slot.
pub trait CrossoverOperator: Send + Sync {
    /// Overwrite `child` with a combination of `first` and `second`
    fn crossover_into<R: Rng>(
        &self,
        first: &Genome,
        second: &Genome,
        child: &mut Genome,
        rng: &mut R,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::topology::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Mock crossover that always takes the second parent
    struct SecondParent;

    impl CrossoverOperator for SecondParent {
        fn crossover_into<R: Rng>(
            &self,
            _first: &Genome,
            second: &Genome,
            child: &mut Genome,
            _rng: &mut R,
        ) {
            child.copy_from(second, 0);
        }
    }

    // Mock mutation that flips the sign of every weight
    struct Negate;

    impl MutationOperator for Negate {
        fn mutate_into<R: Rng>(
            &self,
            donor: &Genome,
            child: &mut Genome,
            _rng: &mut R,
        ) -> MutationKind {
            child.copy_from(donor, 0);
            for w in child.edges_mut().as_mut_slice() {
                *w = -*w;
            }
            MutationKind::WeightSet
        }
    }

    #[test]
    fn test_mock_crossover() {
        let mut rng = StdRng::seed_from_u64(1);
        let topology = Topology::new(2, 2);
        let first = Genome::minimal(topology, &mut rng);
        let second = Genome::minimal(topology, &mut rng);
        let mut child = Genome::minimal(topology, &mut rng);

        SecondParent.crossover_into(&first, &second, &mut child, &mut rng);
        assert_eq!(child.edges(), second.edges());
    }

    #[test]
    fn test_mock_mutation_leaves_donor() {
        let mut rng = StdRng::seed_from_u64(2);
        let topology = Topology::new(2, 1);
        let donor = Genome::minimal(topology, &mut rng);
        let snapshot = donor.clone();
        let mut child = Genome::minimal(topology, &mut rng);

        let kind = Negate.mutate_into(&donor, &mut child, &mut rng);
        assert_eq!(kind, MutationKind::WeightSet);
        assert_eq!(donor, snapshot);
        assert_eq!(child.weight(0, 2), -donor.weight(0, 2));
    }
}
