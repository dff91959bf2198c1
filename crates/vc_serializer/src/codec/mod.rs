//! Conversion of single typed values to and from JSON.
//!
//! The codec has no notion of object identity: `Object` and `Class` values
//! are handed to an [`ExportProcessor`] / [`ImportProcessor`].

mod decode;
mod encode;
mod error;
mod processor;

pub use decode::ValueDecoder;
pub use encode::ValueEncoder;
pub use error::{DecodeError, EncodeError};
pub use processor::{ExportProcessor, ImportProcessor};

use alloc::string::String;

use serde_json::Value as JsonValue;

/// Map placeholder key for keys that have no string form.
#[inline]
pub(crate) fn placeholder_key(index: usize) -> String {
    alloc::format!("Unparsed Key {index}")
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
