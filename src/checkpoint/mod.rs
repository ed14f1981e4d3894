//! Checkpointing support for population persistence
//!
//! This module provides serialization and recovery of population state,
//! so long runs can be paused and resumed.

mod recovery;
mod state;

pub use recovery::*;
pub use state::*;

/// Prelude for checkpoint module
pub mod prelude {
    pub use super::recovery::*;
    pub use super::state::*;
}
