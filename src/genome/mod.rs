//! Genome encoding
//!
//! This module provides the dense node/edge genome and the topology that
//! partitions its node indices.

#[allow(clippy::module_inception)]
pub mod genome;
pub mod matrix;
pub mod topology;

pub mod prelude {
    pub use super::genome::*;
    pub use super::matrix::*;
    pub use super::topology::*;
}
