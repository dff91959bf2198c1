use alloc::string::String;

use thiserror::Error;
use vc_reflect::{ObjectId, ReflectKind, TypeHandle};

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ObjectError {
    #[error("Object {0:?} was not found")]
    NotFound(ObjectId),

    #[error("Type {0} is not a registered class")]
    NotAClass(TypeHandle),

    #[error("Class `{0}` is abstract")]
    AbstractClass(String),

    #[error("Class `{0}` is an actor class and must be spawned into a level")]
    ActorClass(String),

    #[error("Class `{0}` is not an actor class")]
    NotAnActorClass(String),

    #[error("Component `{0}` must be created under an actor")]
    ComponentOuter(String),

    #[error("Object {0:?} is not a level")]
    NotALevel(ObjectId),

    #[error("`{0}` is not a valid object name")]
    InvalidName(String),

    #[error("An object named `{name}` already exists in `{outer}`")]
    NameTaken { name: String, outer: String },

    #[error("Class `{class}` has no field `{field}`")]
    FieldNotFound { class: String, field: String },

    #[error("Field `{field}` expects a {expected} value, found {found}")]
    FieldKindMismatch {
        field: String,
        expected: ReflectKind,
        found: ReflectKind,
    },
}
