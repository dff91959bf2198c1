//! The [`TypeRegistry`] and built-in types.

mod type_registry;

pub mod builtin;

pub use type_registry::{RegistryError, TypeRegistry};
