//! Object-graph save engine.
//!
//! [`GraphSerializer`] turns a set of root objects into one [`SaveDocument`]:
//!
//! - every object gets an [`ObjectIdx`]: `0` is null, positive indices are
//!   objects written inline, negative indices are external paths (assets and
//!   classes) listed once in `__ExternalObjects`;
//! - an object referenced while one of its owners is being written is nested
//!   under that owner's `__SubObjects`;
//! - only fields that differ from the class default object are written.
//!
//! [`GraphDeserializer`] rebuilds the objects in phases: externals are
//! resolved, every object is instantiated, then fields are loaded, so forward
//! and cyclic references always resolve.
//!
//! Types may attach extra state through an
//! [`ExtendDataFactory`](extend::ExtendDataFactory).

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod document;
mod keys;

pub mod codec;
pub mod de;
pub mod extend;
pub mod ser;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use config::{Culture, DeserializeConfig, SerializeConfig};
pub use de::{DeserializeError, GraphDeserializer, NotifyReplay, Phase};
pub use document::{DocumentError, SaveDocument};
pub use extend::{ExtendDataContainer, ExtendDataFactory, ExtendDataRegistry};
pub use keys::*;
pub use ser::{GraphSerializer, SerializeError};

pub use serde_json;
