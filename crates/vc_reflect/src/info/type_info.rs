use core::fmt;

use thiserror::Error;

use crate::info::{ClassInfo, EnumInfo, StructInfo};

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a saveable value.
///
/// Every [`FieldType`](crate::info::FieldType) and every
/// [`Value`](crate::value::Value) has exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Bool,
    Int,
    Float,
    String,
    Text,
    Enum,
    Array,
    Set,
    Map,
    Struct,
    Object,
    Class,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.pad("Bool"),
            Self::Int => f.pad("Int"),
            Self::Float => f.pad("Float"),
            Self::String => f.pad("String"),
            Self::Text => f.pad("Text"),
            Self::Enum => f.pad("Enum"),
            Self::Array => f.pad("Array"),
            Self::Set => f.pad("Set"),
            Self::Map => f.pad("Map"),
            Self::Struct => f.pad("Struct"),
            Self::Object => f.pad("Object"),
            Self::Class => f.pad("Class"),
        }
    }
}

/// Error returned when a [`TypeInfo`] is not the expected kind.
#[derive(Debug, Error, Clone, Copy)]
#[error("reflect kind mismatch: expected {expected}, received {received}")]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

// -----------------------------------------------------------------------------
// TypeHandle

/// A handle to a type registered in a [`TypeRegistry`].
///
/// Handles are only meaningful for the registry that produced them.
///
/// [`TypeRegistry`]: crate::registry::TypeRegistry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(u32);

impl TypeHandle {
    #[inline(always)]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Runtime type information for registered types.
///
/// Only composite types are registered: primitive field types
/// (`Bool`, `Int`, containers and so on) are fully described by
/// their [`FieldType`](crate::info::FieldType).
#[derive(Debug)]
pub enum TypeInfo {
    Struct(StructInfo),
    Enum(EnumInfo),
    Class(ClassInfo),
}

macro_rules! impl_cast_fn {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`] if the type is a `", stringify!($kind), "`.")]
        #[inline]
        pub fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_fn!(as_struct: Struct => StructInfo);
    impl_cast_fn!(as_enum: Enum => EnumInfo);
    impl_cast_fn!(as_class: Class => ClassInfo);

    /// Returns the full path of the type, e.g. `"game.Pawn"`.
    pub fn path(&self) -> &str {
        match self {
            Self::Struct(info) => info.path(),
            Self::Enum(info) => info.path(),
            Self::Class(info) => info.path(),
        }
    }

    /// Returns the last segment of the path, e.g. `"Pawn"`.
    pub fn short_name(&self) -> &str {
        let path = self.path();
        path.rsplit_once('.').map_or(path, |(_, name)| name)
    }

    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Class(_) => ReflectKind::Class,
        }
    }
}
