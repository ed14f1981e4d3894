//! Average-fitness selection
//!
//! Instead of ranking the population, genomes are split around the mean
//! score: everything scoring at least the average is "fit" and survives the
//! generation, everything else is replaced by offspring of the fit side.

use crate::genome::genome::Genome;

/// Partition `genomes` in place so every genome with `fitness >= average`
/// comes first. Returns the number of fit genomes. Order within each side is
/// unspecified; a NaN score counts as unfit.
pub fn partition_by_average(genomes: &mut [Genome], average: f32) -> usize {
    let mut front = 0;
    let mut back = genomes.len();
    while front < back {
        if genomes[front].fitness() >= average {
            front += 1;
        } else {
            back -= 1;
            genomes.swap(front, back);
        }
    }
    front
}

/// Index of the first slot to be replaced by offspring.
///
/// A stale population, or one where nothing was fit, keeps only slot 0 as
/// the elite.
pub fn breeding_cut(fit_count: usize, stale: bool) -> usize {
    if stale || fit_count == 0 {
        1
    } else {
        fit_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::topology::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scored(scores: &[f32]) -> Vec<Genome> {
        let mut rng = StdRng::seed_from_u64(0);
        scores
            .iter()
            .map(|&s| {
                let mut g = Genome::minimal(Topology::new(1, 1), &mut rng);
                g.set_fitness(s);
                g
            })
            .collect()
    }

    #[test]
    fn test_partition_splits_on_average() {
        let mut genomes = scored(&[1.0, 5.0, 2.0, 4.0, 3.0]);
        let cut = partition_by_average(&mut genomes, 3.0);

        assert_eq!(cut, 3);
        assert!(genomes[..cut].iter().all(|g| g.fitness() >= 3.0));
        assert!(genomes[cut..].iter().all(|g| g.fitness() < 3.0));
    }

    #[test]
    fn test_ties_are_fit() {
        let mut genomes = scored(&[2.0, 2.0, 2.0]);
        assert_eq!(partition_by_average(&mut genomes, 2.0), 3);
    }

    #[test]
    fn test_partition_keeps_all_genomes() {
        let mut genomes = scored(&[0.5, -1.0, 3.0, 0.0, 2.5, -4.0]);
        let mut before: Vec<f32> = genomes.iter().map(|g| g.fitness()).collect();
        partition_by_average(&mut genomes, 0.25);
        let mut after: Vec<f32> = genomes.iter().map(|g| g.fitness()).collect();
        before.sort_by(|a, b| a.partial_cmp(b).unwrap());
        after.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(before, after);
    }

    #[test]
    fn test_nan_is_unfit() {
        let mut genomes = scored(&[f32::NAN, 1.0]);
        let cut = partition_by_average(&mut genomes, 0.0);
        assert_eq!(cut, 1);
        assert_eq!(genomes[0].fitness(), 1.0);
    }

    #[test]
    fn test_breeding_cut() {
        assert_eq!(breeding_cut(4, false), 4);
        assert_eq!(breeding_cut(4, true), 1);
        assert_eq!(breeding_cut(0, false), 1);
    }
}
