//! The live object world: packages, levels, actors, components and plain objects.
//!
//! Every object has a name, a class, an outer (its container) and a set of
//! dynamic fields initialized from the class default object. Actors are
//! spawned into a level and may have a logical owner that is not their outer.
//!
//! Objects are addressed by path: `/Level1/Actor_3/Mesh`. Classes are
//! addressed by type path: `game.Pawn`.

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod hooks;
pub mod object;
pub mod world;

// -----------------------------------------------------------------------------
// Exports

pub use error::ObjectError;
pub use hooks::ClassHooks;
pub use object::{ObjectData, ObjectFlags, ObjectState};
pub use world::{DeferredActor, PathTarget, SpawnParams, World};

pub use vc_reflect::ObjectId;
