//! # fast-neat
//!
//! A compact topology-evolving neural network optimizer.
//!
//! Networks are encoded as dense genomes (node biases plus a full edge
//! matrix), evaluated with a single feed-forward pass, and evolved by an
//! average-fitness selection scheme that breeds offspring through structural
//! mutation and uniform crossover. The best network can be extracted into a
//! sparse model and written to a small binary file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fast_neat::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let mut population = Population::new(2, 1, 50, &mut rng)?;
//! let xor = TruthTable::xor();
//!
//! let mut best = population.update(&xor, &mut rng);
//! for _ in 1..200 {
//!     best = population.update(&xor, &mut rng);
//! }
//!
//! let outputs = population.evaluate(&best, &[1.0, 0.0])?;
//! assert_eq!(outputs.len(), 1);
//! population.extract_model(&best)?.save("xor.model")?;
//! # Ok::<(), fast_neat::error::NeatError>(())
//! ```

pub mod algorithms;
pub mod checkpoint;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod model;
pub mod network;
pub mod operators;
pub mod population;
pub mod random;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::checkpoint::prelude::*;
    pub use crate::config::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::model::prelude::*;
    pub use crate::network::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::prelude::*;
}
