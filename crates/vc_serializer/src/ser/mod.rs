//! Writing object graphs, see [`GraphSerializer`].

mod error;
mod graph;
mod placement;

pub use error::SerializeError;
pub use graph::GraphSerializer;
