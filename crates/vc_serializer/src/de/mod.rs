//! Loading object graphs, see [`GraphDeserializer`].

mod error;
mod graph;
mod import;
mod phases;
mod replay;

pub use error::{DeserializeError, Phase};
pub use graph::GraphDeserializer;
pub use replay::NotifyReplay;
