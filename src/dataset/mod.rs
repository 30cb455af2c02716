//! Dataset loading and normalization into the canonical graph.

mod error;
pub mod fetch;
mod model;
pub mod normalize;

pub use error::{LoadError, Result};
pub use model::{CanonicalGraph, Link, Node, Relationship, UserMap, UserRecord};
pub use normalize::{DatasetFormat, NormalizeReport};
