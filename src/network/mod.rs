//! Network evaluation
//!
//! This module runs forward passes over genomes.

pub mod evaluator;

pub mod prelude {
    pub use super::evaluator::*;
}
