use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Number, Value as JsonValue};
use vc_reflect::{DynamicStruct, FieldFilter, FieldType, NamedField, TypeHandle, TypeRegistry, Value};

use super::{EncodeError, ExportProcessor, placeholder_key};

// -----------------------------------------------------------------------------
// ValueEncoder

/// Encodes values against their schema, diffing them with a default.
///
/// Every `encode` call returns the JSON value and whether the value is equal
/// to the given default. Callers skip fields that are equal to their default.
///
/// - Arrays compare per index with the default's element at the same index.
/// - Sets and maps are written in full and compare as a whole.
/// - A struct is equal to its default only if every visited field is.
///
/// # Examples
///
/// ```
/// use vc_reflect::{FieldType, TypeRegistry, Value};
/// use vc_serializer::codec::ValueEncoder;
///
/// let registry = TypeRegistry::new();
/// let mut encoder = ValueEncoder::new(&registry);
///
/// let (json, same) = encoder
///     .encode(&FieldType::Int, &Value::Int(3), Some(&Value::Int(3)))
///     .unwrap();
/// assert_eq!(json, 3);
/// assert!(same);
/// ```
pub struct ValueEncoder<'a, P: ExportProcessor = ()> {
    registry: &'a TypeRegistry,
    filter: FieldFilter,
    processor: Option<&'a mut P>,
}

impl<'a> ValueEncoder<'a, ()> {
    /// Creates an encoder without a reference processor.
    #[inline]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            filter: FieldFilter::default(),
            processor: None,
        }
    }
}

impl<'a, P: ExportProcessor> ValueEncoder<'a, P> {
    #[inline]
    pub fn with_processor(registry: &'a TypeRegistry, processor: &'a mut P) -> Self {
        Self {
            registry,
            filter: FieldFilter::default(),
            processor: Some(processor),
        }
    }

    #[inline]
    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn encode(
        &mut self,
        ty: &FieldType,
        value: &Value,
        default: Option<&Value>,
    ) -> Result<(JsonValue, bool), EncodeError> {
        let same = default == Some(value);

        match (ty, value) {
            (FieldType::Bool, Value::Bool(v)) => Ok((JsonValue::Bool(*v), same)),
            (FieldType::Int, Value::Int(v)) => Ok((JsonValue::from(*v), same)),
            (FieldType::Float, Value::Float(v)) => {
                let json = Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number);
                Ok((json, same))
            }
            (FieldType::String, Value::String(v)) | (FieldType::Text, Value::Text(v)) => {
                Ok((JsonValue::String(v.clone()), same))
            }
            (FieldType::Enum(handle), Value::Enum(v)) => {
                let info = self
                    .registry
                    .enum_info(*handle)
                    .ok_or(EncodeError::UnknownType(*handle))?;
                let name = info.name_of(*v).ok_or_else(|| EncodeError::UnknownEnumValue {
                    path: info.path().into(),
                    value: *v,
                })?;
                Ok((JsonValue::String(name.into()), same))
            }
            (FieldType::Array(element), Value::Array(items)) => {
                let defaults = default.and_then(Value::as_slice);
                let mut same = defaults.is_some_and(|d| d.len() == items.len());
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let (json, item_same) = self.encode(element, item, defaults.and_then(|d| d.get(i)))?;
                    same &= item_same;
                    out.push(json);
                }
                Ok((JsonValue::Array(out), same))
            }
            (FieldType::Set(element), Value::Set(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.encode(element, item, None)?.0);
                }
                Ok((JsonValue::Array(out), same))
            }
            (FieldType::Map(key_ty, value_ty), Value::Map(entries)) => {
                let mut out = Map::new();
                for (i, (key, item)) in entries.iter().enumerate() {
                    let key = self.encode_key(key_ty, key, i)?;
                    let (json, _) = self.encode(value_ty, item, None)?;
                    out.insert(key, json);
                }
                Ok((JsonValue::Object(out), same))
            }
            (FieldType::Struct(handle), Value::Struct(v)) => {
                self.encode_struct(*handle, v, default.and_then(Value::as_struct))
            }
            (FieldType::Object(_), Value::Object(_)) | (FieldType::Class(_), Value::Class(_)) => {
                let unsupported = || EncodeError::UnsupportedReference(ty.kind());
                let processor = self.processor.as_deref_mut().ok_or_else(unsupported)?;
                let json = processor.try_export(ty, value).ok_or_else(unsupported)??;
                Ok((json, same))
            }
            _ => Err(EncodeError::KindMismatch {
                expected: ty.kind(),
                found: value.kind(),
            }),
        }
    }

    /// Encodes a struct as its text form, or as a map of the fields that
    /// differ from `default` (every field without a default).
    pub fn encode_struct(
        &mut self,
        handle: TypeHandle,
        value: &DynamicStruct,
        default: Option<&DynamicStruct>,
    ) -> Result<(JsonValue, bool), EncodeError> {
        let registry = self.registry;
        let info = registry
            .struct_info(handle)
            .ok_or(EncodeError::UnknownType(handle))?;

        if let Some(format) = info.text_format() {
            if let Some(text) = format.export_text(value) {
                let same = default
                    .and_then(|d| format.export_text(d))
                    .is_some_and(|d| d == text);
                return Ok((JsonValue::String(text), same));
            }
            log::warn!("`{}` value has no text form, writing its fields", info.path());
        }

        let fields = registry.persisted_fields(handle, self.filter);
        let mut out = Map::new();
        let same = self.encode_fields(&fields, value, default, &mut out)?;
        Ok((JsonValue::Object(out), same))
    }

    /// Writes every field of `value` that differs from `default` into `out`.
    ///
    /// Returns `true` if nothing was written.
    pub fn encode_fields(
        &mut self,
        fields: &[&NamedField],
        value: &DynamicStruct,
        default: Option<&DynamicStruct>,
        out: &mut Map<String, JsonValue>,
    ) -> Result<bool, EncodeError> {
        let mut all_same = true;
        for field in fields {
            let name = field.name();
            let Some(item) = value.get(name) else {
                continue;
            };
            let (json, same) = self
                .encode(field.ty(), item, default.and_then(|d| d.get(name)))
                .map_err(|e| e.in_field(name))?;
            if !same {
                out.insert(name.into(), json);
                all_same = false;
            }
        }
        Ok(all_same)
    }

    fn encode_key(&mut self, ty: &FieldType, key: &Value, index: usize) -> Result<String, EncodeError> {
        let text = match (ty, key) {
            (FieldType::String, Value::String(s)) | (FieldType::Text, Value::Text(s)) => Some(s.clone()),
            (FieldType::Int, Value::Int(v)) => Some(v.to_string()),
            (FieldType::Float, Value::Float(v)) => Some(v.to_string()),
            (FieldType::Bool, Value::Bool(v)) => Some(v.to_string()),
            (FieldType::Enum(h), Value::Enum(v)) => self
                .registry
                .enum_info(*h)
                .and_then(|info| info.name_of(*v))
                .map(Into::into),
            (FieldType::Struct(h), Value::Struct(v)) => self
                .registry
                .struct_info(*h)
                .and_then(|info| info.text_format())
                .and_then(|format| format.export_text(v)),
            _ if ty.kind() != key.kind() => {
                return Err(EncodeError::KindMismatch {
                    expected: ty.kind(),
                    found: key.kind(),
                });
            }
            _ => None,
        };

        Ok(text.unwrap_or_else(|| {
            let placeholder = placeholder_key(index);
            log::error!(
                "{} map key has no string form, written as `{placeholder}`",
                ty.kind()
            );
            placeholder
        }))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vc_reflect::info::{EnumInfo, StructInfo};
    use vc_reflect::{DynamicStruct, FieldType, NamedField, TypeRegistry, Value, builtin};

    use super::ValueEncoder;
    use crate::codec::EncodeError;

    #[test]
    fn scalars() {
        let mut registry = TypeRegistry::new();
        let team = registry
            .register_enum(EnumInfo::new("game.Team").with_variant("Red", 0).with_variant("Blue", 1))
            .unwrap();
        let mut encoder = ValueEncoder::new(&registry);

        let (json, same) = encoder.encode(&FieldType::Enum(team), &Value::Enum(1), Some(&Value::Enum(0))).unwrap();
        assert_eq!(json, "Blue");
        assert!(!same);

        let (json, _) = encoder.encode(&FieldType::Float, &Value::Float(f64::NAN), None).unwrap();
        assert!(json.is_null());

        assert!(matches!(
            encoder.encode(&FieldType::Enum(team), &Value::Enum(7), None),
            Err(EncodeError::UnknownEnumValue { value: 7, .. })
        ));
        assert!(matches!(
            encoder.encode(&FieldType::Int, &Value::Bool(true), None),
            Err(EncodeError::KindMismatch { .. })
        ));
        assert!(matches!(
            encoder.encode(&FieldType::Object(builtin::OBJECT), &Value::Object(None), None),
            Err(EncodeError::UnsupportedReference(_))
        ));
    }

    #[test]
    fn array_diff_is_per_index() {
        let registry = TypeRegistry::new();
        let mut encoder = ValueEncoder::new(&registry);
        let ty = FieldType::array(FieldType::Int);

        let value = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        let (json, same) = encoder.encode(&ty, &value, Some(&value.clone())).unwrap();
        assert_eq!(json, json!([1, 2]));
        assert!(same);

        let longer = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let (_, same) = encoder.encode(&ty, &longer, Some(&value)).unwrap();
        assert!(!same);
    }

    #[test]
    fn struct_diff_writes_changed_fields_only() {
        let mut registry = TypeRegistry::new();
        let stats = registry
            .register_struct(
                StructInfo::new("game.Stats")
                    .with_field(NamedField::new("Level", FieldType::Int).with_default(Value::Int(1)))
                    .with_field(NamedField::new("Name", FieldType::String))
                    .with_field(NamedField::new("Tint", FieldType::Struct(builtin::COLOR))),
            )
            .unwrap();
        let default = registry.default_fields(stats).unwrap().clone();
        let mut encoder = ValueEncoder::new(&registry);

        let (json, same) = encoder.encode_struct(stats, &default, Some(&default)).unwrap();
        assert_eq!(json, json!({}));
        assert!(same);

        let mut changed = default.clone();
        changed.insert("Level", Value::Int(5));
        let (json, same) = encoder.encode_struct(stats, &changed, Some(&default)).unwrap();
        assert_eq!(json, json!({ "Level": 5 }));
        assert!(!same);

        let (json, _) = encoder.encode_struct(stats, &default, None).unwrap();
        assert_eq!(json, json!({ "Level": 1, "Name": "", "Tint": "000000FF" }));
    }

    #[test]
    fn unparsed_map_keys() {
        let mut registry = TypeRegistry::new();
        let point = registry
            .register_struct(StructInfo::new("game.Point").with_field(NamedField::new("X", FieldType::Int)))
            .unwrap();
        let mut encoder = ValueEncoder::new(&registry);

        let ty = FieldType::map(FieldType::Struct(point), FieldType::Int);
        let key = |x: i64| Value::Struct(DynamicStruct::new(Some(point)).with("X", x));
        let value = Value::Map(vec![(key(1), Value::Int(10)), (key(2), Value::Int(20))]);

        let (json, _) = encoder.encode(&ty, &value, None).unwrap();
        assert_eq!(json, json!({ "Unparsed Key 0": 10, "Unparsed Key 1": 20 }));

        let ty = FieldType::map(FieldType::Int, FieldType::Bool);
        let value = Value::Map(vec![(Value::Int(-4), Value::Bool(true))]);
        let (json, _) = encoder.encode(&ty, &value, None).unwrap();
        assert_eq!(json, json!({ "-4": true }));
    }
}
