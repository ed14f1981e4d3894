//! Model extraction and persistence
//!
//! A [`Model`] is an immutable snapshot of one genome that can be written to
//! the compact binary model format and parsed back.

pub mod file;
#[allow(clippy::module_inception)]
pub mod model;

pub use file::{ModelFile, ModelHeader};
pub use model::Model;

pub mod prelude {
    pub use super::file::*;
    pub use super::model::*;
}
