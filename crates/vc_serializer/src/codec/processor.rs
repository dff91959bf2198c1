use serde_json::Value as JsonValue;
use vc_reflect::{FieldType, Value};

use super::{DecodeError, EncodeError};

/// Writes `Object` and `Class` values for a [`ValueEncoder`].
///
/// ## Return Value Semantics
///
/// - **`Some(Ok(json))`** → the reference was written
/// - **`Some(Err(error))`** → the reference is supported but could not be written
/// - **`None`** → references of this kind are not supported
///
/// ## Default Implementation
///
/// The trait is implemented for `()` as a processor that supports nothing,
/// so encoding a reference without a processor is an error.
///
/// [`ValueEncoder`]: crate::codec::ValueEncoder
pub trait ExportProcessor {
    fn try_export(&mut self, ty: &FieldType, value: &Value) -> Option<Result<JsonValue, EncodeError>>;
}

impl ExportProcessor for () {
    #[inline]
    fn try_export(&mut self, _ty: &FieldType, _value: &Value) -> Option<Result<JsonValue, EncodeError>> {
        None
    }
}

/// Reads `Object` and `Class` values for a [`ValueDecoder`].
///
/// Same return value semantics as [`ExportProcessor`].
///
/// [`ValueDecoder`]: crate::codec::ValueDecoder
pub trait ImportProcessor {
    fn try_import(&mut self, ty: &FieldType, json: &JsonValue) -> Option<Result<Value, DecodeError>>;
}

impl ImportProcessor for () {
    #[inline]
    fn try_import(&mut self, _ty: &FieldType, _json: &JsonValue) -> Option<Result<Value, DecodeError>> {
        None
    }
}
