//! Custom text import/export for struct types.

use alloc::string::String;

use thiserror::Error;

use crate::value::DynamicStruct;

mod color;
mod date_time;

pub use color::ColorFormat;
pub use date_time::{DateTimeFormat, MAX_TICKS, TICKS_PER_SECOND};

// -----------------------------------------------------------------------------
// TextFormat

/// A struct type that can be written as a single string.
///
/// When a struct type carries a text format, the serializer writes the
/// exported text instead of a field map, and the deserializer accepts it back.
pub trait TextFormat: Send + Sync {
    /// Returns `None` when the value does not have the expected fields.
    fn export_text(&self, value: &DynamicStruct) -> Option<String>;

    /// Overwrites the fields of `value` from `text`.
    fn import_text(&self, text: &str, value: &mut DynamicStruct) -> Result<(), TextFormatError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TextFormatError {
    #[error("`{text}` is not a valid {expected}")]
    Invalid { expected: &'static str, text: String },

    #[error("{expected} `{text}` is out of range")]
    OutOfRange { expected: &'static str, text: String },
}
