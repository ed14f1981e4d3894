//! Evolution drivers
//!
//! This module provides the generation loop built on top of the population
//! controller.

pub mod evolve;

pub mod prelude {
    pub use super::evolve::*;
}
