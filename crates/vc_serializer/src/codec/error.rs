use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;
use vc_reflect::text::TextFormatError;
use vc_reflect::{ReflectKind, TypeHandle};

// -----------------------------------------------------------------------------
// EncodeError

/// A value does not match its schema, or a reference cannot be written.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("Expected a {expected} value, found {found}")]
    KindMismatch {
        expected: ReflectKind,
        found: ReflectKind,
    },

    #[error("Type {0} is not registered with the expected kind")]
    UnknownType(TypeHandle),

    #[error("{value} is not a variant of enum `{path}`")]
    UnknownEnumValue { path: String, value: i64 },

    #[error("{0} references are not supported by this encoder")]
    UnsupportedReference(ReflectKind),

    #[error("Object `{path}` is not owned by any object being serialized")]
    UnresolvedOwner { path: String },

    #[error("Field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    #[inline]
    pub(crate) fn in_field(self, field: &str) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

// -----------------------------------------------------------------------------
// DecodeError

/// A JSON value cannot be loaded into its field.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("Expected {expected}, found JSON {found}")]
    TypeMismatch {
        expected: ReflectKind,
        found: &'static str,
    },

    #[error("`{0}` is not a valid 64-bit integer")]
    InvalidInteger(String),

    #[error("`{0}` is not a valid float")]
    InvalidFloat(String),

    #[error("`{name}` is not a variant of enum `{path}`")]
    UnknownEnumName { path: String, name: String },

    #[error("{value} is not a variant of enum `{path}`")]
    UnknownEnumValue { path: String, value: i64 },

    #[error("Map key `{0}` cannot be parsed")]
    UnparsableKey(String),

    #[error("Invalid text for `{path}`: {source}")]
    InvalidStructText {
        path: String,
        #[source]
        source: TextFormatError,
    },

    #[error("Type {0} is not registered with the expected kind")]
    UnknownType(TypeHandle),

    #[error("{0} references are not supported by this decoder")]
    UnsupportedReference(ReflectKind),

    #[error("`{0}` is not an object index")]
    InvalidIndex(String),

    #[error("Field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    #[inline]
    pub(crate) fn in_field(self, field: &str) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }
}
