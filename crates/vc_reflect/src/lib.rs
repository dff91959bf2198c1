//! Runtime schema registry for saveable types.
//!
//! Types are described explicitly: a [`TypeRegistry`](registry::TypeRegistry)
//! holds [`TypeInfo`](info::TypeInfo) for structs, enums and classes, and live
//! data is stored as dynamic [`Value`](value::Value)s shaped by those schemas.
//!
//! Structs may declare a [`TextFormat`](text::TextFormat) to be exported as a
//! single string instead of a field map (see [`text::ColorFormat`] and
//! [`text::DateTimeFormat`]).

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
pub mod info;
pub mod registry;
pub mod text;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use info::{FieldFilter, FieldFlags, FieldType, NamedField, ReflectKind, TypeHandle, TypeInfo};
pub use registry::{TypeRegistry, builtin};
pub use value::{DynamicStruct, ObjectId, Value};
