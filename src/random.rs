//! Random draws used by initialization, selection and the genetic operators
//!
//! Every helper takes the caller's generator explicitly, so a seeded
//! `StdRng` makes a whole evolutionary run reproducible.

use rand::Rng;

/// Uniform value in `[0, 1]` (both ends inclusive)
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..=1.0)
}

/// Uniform value in `[-1, 1]`, used for fresh weights and biases
pub fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    uniform(rng) * 2.0 - 1.0
}

/// Uniform index in `[0, bound)`
///
/// # Panics
///
/// Panics if `bound` is zero.
pub fn index<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> usize {
    assert!(bound > 0, "index bound must be positive");
    rng.gen_range(0..bound)
}

/// Fair coin flip
pub fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen()
}
