//! Population management
//!
//! This module provides the Population controller and its builder.

pub mod builder;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::builder::*;
    pub use super::population::*;
}
