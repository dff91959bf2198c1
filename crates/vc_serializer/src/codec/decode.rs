use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use vc_reflect::{DynamicStruct, FieldFilter, FieldType, NamedField, TypeHandle, TypeRegistry, Value};

use super::{DecodeError, ImportProcessor, json_kind};
use crate::config::Culture;

static ENGLISH: Culture = Culture::ENGLISH;

// -----------------------------------------------------------------------------
// ValueDecoder

/// Loads JSON values into typed values, overlaying what is already there.
///
/// - `null` leaves the target untouched.
/// - Arrays are resized to the JSON length and overlaid element by element.
/// - Sets and maps are rebuilt; unparsable map keys are skipped.
/// - Struct fields missing from the JSON keep their current value.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vc_reflect::{FieldType, TypeRegistry, Value};
/// use vc_serializer::codec::ValueDecoder;
///
/// let registry = TypeRegistry::new();
/// let mut decoder = ValueDecoder::new(&registry);
///
/// let mut value = Value::Int(0);
/// decoder.decode(&FieldType::Int, &json!("9007199254740993"), &mut value).unwrap();
/// assert_eq!(value, Value::Int(9007199254740993));
/// ```
pub struct ValueDecoder<'a, P: ImportProcessor = ()> {
    registry: &'a TypeRegistry,
    filter: FieldFilter,
    culture: &'a Culture,
    processor: Option<&'a mut P>,
}

impl<'a> ValueDecoder<'a, ()> {
    /// Creates a decoder without a reference processor.
    #[inline]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            filter: FieldFilter::default(),
            culture: &ENGLISH,
            processor: None,
        }
    }
}

impl<'a, P: ImportProcessor> ValueDecoder<'a, P> {
    #[inline]
    pub fn with_processor(registry: &'a TypeRegistry, processor: &'a mut P) -> Self {
        Self {
            registry,
            filter: FieldFilter::default(),
            culture: &ENGLISH,
            processor: Some(processor),
        }
    }

    #[inline]
    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    #[inline]
    pub fn with_culture(mut self, culture: &'a Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn decode(&mut self, ty: &FieldType, json: &JsonValue, value: &mut Value) -> Result<(), DecodeError> {
        if json.is_null() {
            return Ok(());
        }
        let mismatch = || DecodeError::TypeMismatch {
            expected: ty.kind(),
            found: json_kind(json),
        };

        match ty {
            FieldType::Bool => *value = Value::Bool(json.as_bool().ok_or_else(mismatch)?),
            FieldType::Int => *value = Value::Int(read_int(json).ok_or_else(mismatch)??),
            FieldType::Float => *value = Value::Float(read_float(json).ok_or_else(mismatch)??),
            FieldType::String => *value = Value::String(json.as_str().ok_or_else(mismatch)?.into()),
            FieldType::Text => match json {
                JsonValue::String(s) => *value = Value::Text(s.clone()),
                JsonValue::Object(translations) => match self.culture.select_text(translations) {
                    Some(text) => *value = Value::Text(text.into()),
                    None => log::warn!(
                        "no translation for culture `{}`, keeping the current text",
                        self.culture.name()
                    ),
                },
                _ => return Err(mismatch()),
            },
            FieldType::Enum(handle) => *value = Value::Enum(self.decode_enum(*handle, json)?),
            FieldType::Array(element) => {
                let items = json.as_array().ok_or_else(mismatch)?;
                let mut current = match core::mem::replace(value, Value::Array(Vec::new())) {
                    Value::Array(v) => v,
                    _ => Vec::new(),
                };
                current.truncate(items.len());
                while current.len() < items.len() {
                    current.push(self.registry.default_value(element));
                }
                let result = items
                    .iter()
                    .zip(current.iter_mut())
                    .try_for_each(|(json, item)| self.decode(element, json, item));
                *value = Value::Array(current);
                result?;
            }
            FieldType::Set(element) => {
                let items = json.as_array().ok_or_else(mismatch)?;
                let mut set = Vec::with_capacity(items.len());
                for json in items {
                    let mut item = self.registry.default_value(element);
                    self.decode(element, json, &mut item)?;
                    if !set.contains(&item) {
                        set.push(item);
                    }
                }
                *value = Value::Set(set);
            }
            FieldType::Map(key_ty, value_ty) => {
                let entries = json.as_object().ok_or_else(mismatch)?;
                let mut map: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
                for (key, json) in entries {
                    let key = match self.decode_key(key_ty, key) {
                        Ok(key) => key,
                        Err(e) => {
                            log::error!("skipping map entry: {e}");
                            continue;
                        }
                    };
                    let mut item = self.registry.default_value(value_ty);
                    self.decode(value_ty, json, &mut item)?;
                    match map.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, slot)) => *slot = item,
                        None => map.push((key, item)),
                    }
                }
                *value = Value::Map(map);
            }
            FieldType::Struct(handle) => {
                let handle = *handle;
                let keep = value
                    .as_struct()
                    .is_some_and(|s| s.represented_type() == Some(handle));
                if !keep {
                    *value = self.registry.default_value(ty);
                }
                if let Some(target) = value.as_struct_mut() {
                    self.decode_struct(handle, json, target)?;
                }
            }
            FieldType::Object(_) | FieldType::Class(_) => {
                let unsupported = || DecodeError::UnsupportedReference(ty.kind());
                let processor = self.processor.as_deref_mut().ok_or_else(unsupported)?;
                *value = processor.try_import(ty, json).ok_or_else(unsupported)??;
            }
        }
        Ok(())
    }

    /// Loads a struct from its text form or from a map of fields.
    pub fn decode_struct(
        &mut self,
        handle: TypeHandle,
        json: &JsonValue,
        target: &mut DynamicStruct,
    ) -> Result<(), DecodeError> {
        let registry = self.registry;
        let info = registry
            .struct_info(handle)
            .ok_or(DecodeError::UnknownType(handle))?;

        match json {
            JsonValue::String(text) => {
                let format = info.text_format().ok_or(DecodeError::TypeMismatch {
                    expected: FieldType::Struct(handle).kind(),
                    found: "string",
                })?;
                let mut imported = target.clone();
                format
                    .import_text(text, &mut imported)
                    .map_err(|source| DecodeError::InvalidStructText {
                        path: info.path().into(),
                        source,
                    })?;
                *target = imported;
                Ok(())
            }
            JsonValue::Object(fields) => {
                let fields_info = registry.persisted_fields(handle, self.filter);
                self.decode_fields(&fields_info, fields, target);
                Ok(())
            }
            other => Err(DecodeError::TypeMismatch {
                expected: FieldType::Struct(handle).kind(),
                found: json_kind(other),
            }),
        }
    }

    /// Loads every field present in `json`; a field that fails is logged
    /// and keeps its current value.
    pub fn decode_fields(
        &mut self,
        fields: &[&NamedField],
        json: &Map<String, JsonValue>,
        target: &mut DynamicStruct,
    ) {
        for field in fields {
            let Some(item) = json.get(field.name()) else {
                continue;
            };
            if let Err(e) = self.decode_field(field, item, target) {
                log::warn!("{e}");
            }
        }
    }

    /// Loads one field and returns its prior value.
    ///
    /// The field is left untouched on error.
    pub fn decode_field(
        &mut self,
        field: &NamedField,
        json: &JsonValue,
        target: &mut DynamicStruct,
    ) -> Result<Value, DecodeError> {
        let name = field.name();
        let prior = match target.get(name) {
            Some(value) => value.clone(),
            None => self.registry.default_value(field.ty()),
        };
        let mut next = prior.clone();
        self.decode(field.ty(), json, &mut next)
            .map_err(|e| e.in_field(name))?;
        target.insert(name, next);
        Ok(prior)
    }

    /// Parses a map key written by a [`ValueEncoder`](super::ValueEncoder).
    pub fn decode_key(&self, ty: &FieldType, key: &str) -> Result<Value, DecodeError> {
        let unparsable = || DecodeError::UnparsableKey(key.into());
        match ty {
            FieldType::String => Ok(Value::String(key.into())),
            FieldType::Text => Ok(Value::Text(key.into())),
            FieldType::Int => key.parse().map(Value::Int).map_err(|_| unparsable()),
            FieldType::Float => key.parse().map(Value::Float).map_err(|_| unparsable()),
            FieldType::Bool => key.parse().map(Value::Bool).map_err(|_| unparsable()),
            FieldType::Enum(handle) => self
                .registry
                .enum_info(*handle)
                .and_then(|info| info.value_of(key))
                .map(Value::Enum)
                .ok_or_else(unparsable),
            FieldType::Struct(handle) => {
                let format = self
                    .registry
                    .struct_info(*handle)
                    .and_then(|info| info.text_format())
                    .ok_or_else(unparsable)?;
                let mut value = self.registry.default_value(ty);
                let target = value.as_struct_mut().ok_or_else(unparsable)?;
                format.import_text(key, target).map_err(|_| unparsable())?;
                Ok(value)
            }
            _ => Err(unparsable()),
        }
    }

    fn decode_enum(&self, handle: TypeHandle, json: &JsonValue) -> Result<i64, DecodeError> {
        let info = self
            .registry
            .enum_info(handle)
            .ok_or(DecodeError::UnknownType(handle))?;
        match json {
            JsonValue::String(name) => info.value_of(name).ok_or_else(|| DecodeError::UnknownEnumName {
                path: info.path().into(),
                name: name.clone(),
            }),
            JsonValue::Number(_) => {
                let value = read_int(json).ok_or_else(|| DecodeError::InvalidInteger(json.to_string()))??;
                match info.name_of(value) {
                    Some(_) => Ok(value),
                    None => Err(DecodeError::UnknownEnumValue {
                        path: info.path().into(),
                        value,
                    }),
                }
            }
            other => Err(DecodeError::TypeMismatch {
                expected: FieldType::Enum(handle).kind(),
                found: json_kind(other),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Scalars

/// `None` if the JSON kind cannot hold an integer.
fn read_int(json: &JsonValue) -> Option<Result<i64, DecodeError>> {
    let invalid = || DecodeError::InvalidInteger(json.to_string());
    match json {
        JsonValue::Number(n) => Some(match n.as_i64() {
            Some(v) => Ok(v),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
                .ok_or_else(invalid),
        }),
        JsonValue::String(s) => Some(s.trim().parse().map_err(|_| DecodeError::InvalidInteger(s.clone()))),
        _ => None,
    }
}

fn read_float(json: &JsonValue) -> Option<Result<f64, DecodeError>> {
    match json {
        JsonValue::Number(n) => n.as_f64().map(Ok),
        JsonValue::String(s) => Some(s.trim().parse().map_err(|_| DecodeError::InvalidFloat(s.clone()))),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vc_reflect::info::{EnumInfo, StructInfo};
    use vc_reflect::{DynamicStruct, FieldType, NamedField, TypeRegistry, Value, builtin};

    use super::ValueDecoder;
    use crate::Culture;
    use crate::codec::DecodeError;

    #[test]
    fn integers_keep_precision() {
        let registry = TypeRegistry::new();
        let mut decoder = ValueDecoder::new(&registry);

        let mut value = Value::Int(0);
        decoder.decode(&FieldType::Int, &json!(42), &mut value).unwrap();
        assert_eq!(value, Value::Int(42));

        decoder.decode(&FieldType::Int, &json!("9007199254740993"), &mut value).unwrap();
        assert_eq!(value, Value::Int(9_007_199_254_740_993));

        decoder.decode(&FieldType::Int, &json!(null), &mut value).unwrap();
        assert_eq!(value, Value::Int(9_007_199_254_740_993));

        assert!(matches!(
            decoder.decode(&FieldType::Int, &json!("abc"), &mut value),
            Err(DecodeError::InvalidInteger(_))
        ));
        assert!(matches!(
            decoder.decode(&FieldType::Int, &json!(true), &mut value),
            Err(DecodeError::TypeMismatch { found: "bool", .. })
        ));
    }

    #[test]
    fn localized_text() {
        let registry = TypeRegistry::new();
        let culture = Culture::new("zh-Hans-CN");
        let mut decoder = ValueDecoder::new(&registry).with_culture(&culture);

        let mut value = Value::Text("old".into());
        decoder
            .decode(&FieldType::Text, &json!({ "en": "Sword", "zh-Hans": "剑" }), &mut value)
            .unwrap();
        assert_eq!(value, Value::Text("剑".into()));

        decoder.decode(&FieldType::Text, &json!({ "de": "Schwert" }), &mut value).unwrap();
        assert_eq!(value, Value::Text("剑".into()));
    }

    #[test]
    fn enums_by_name_or_value() {
        let mut registry = TypeRegistry::new();
        let team = registry
            .register_enum(EnumInfo::new("game.Team").with_variant("Red", 0).with_variant("Blue", 4))
            .unwrap();
        let mut decoder = ValueDecoder::new(&registry);
        let ty = FieldType::Enum(team);

        let mut value = Value::Enum(0);
        decoder.decode(&ty, &json!("Blue"), &mut value).unwrap();
        assert_eq!(value, Value::Enum(4));
        decoder.decode(&ty, &json!(0), &mut value).unwrap();
        assert_eq!(value, Value::Enum(0));

        assert!(matches!(
            decoder.decode(&ty, &json!("Green"), &mut value),
            Err(DecodeError::UnknownEnumName { .. })
        ));
        assert!(matches!(
            decoder.decode(&ty, &json!(3), &mut value),
            Err(DecodeError::UnknownEnumValue { value: 3, .. })
        ));
    }

    #[test]
    fn containers() {
        let registry = TypeRegistry::new();
        let mut decoder = ValueDecoder::new(&registry);

        let ty = FieldType::array(FieldType::Int);
        let mut value = Value::Array(vec![Value::Int(7), Value::Int(8), Value::Int(9)]);
        decoder.decode(&ty, &json!([null, 5]), &mut value).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(7), Value::Int(5)]));

        let ty = FieldType::set(FieldType::String);
        decoder.decode(&ty, &json!(["a", "b", "a"]), &mut value).unwrap();
        assert_eq!(value, Value::Set(vec![Value::from("a"), Value::from("b")]));

        let ty = FieldType::map(FieldType::Int, FieldType::Bool);
        decoder
            .decode(&ty, &json!({ "1": true, "Unparsed Key 0": false, "-2": false }), &mut value)
            .unwrap();
        assert_eq!(
            value,
            Value::Map(vec![
                (Value::Int(1), Value::Bool(true)),
                (Value::Int(-2), Value::Bool(false)),
            ])
        );
    }

    #[test]
    fn structs() {
        let mut registry = TypeRegistry::new();
        let stats = registry
            .register_struct(
                StructInfo::new("game.Stats")
                    .with_field(NamedField::new("Level", FieldType::Int).with_default(Value::Int(1)))
                    .with_field(NamedField::new("Tint", FieldType::Struct(builtin::COLOR))),
            )
            .unwrap();
        let mut decoder = ValueDecoder::new(&registry);
        let ty = FieldType::Struct(stats);

        let mut value = registry.default_value(&ty);
        decoder
            .decode(&ty, &json!({ "Tint": "#FF8000", "Unknown": 1 }), &mut value)
            .unwrap();

        let data = value.as_struct().unwrap();
        assert_eq!(data.get("Level"), Some(&Value::Int(1)));
        let tint = data.get("Tint").and_then(Value::as_struct).unwrap();
        assert_eq!(tint.get("R"), Some(&Value::Int(255)));
        assert_eq!(tint.get("G"), Some(&Value::Int(128)));
        assert_eq!(tint.get("A"), Some(&Value::Int(255)));

        // A bad field is skipped, the rest still load.
        decoder
            .decode(&ty, &json!({ "Level": "high", "Tint": "00000000" }), &mut value)
            .unwrap();
        let data = value.as_struct().unwrap();
        assert_eq!(data.get("Level"), Some(&Value::Int(1)));
        assert_eq!(
            data.get("Tint").and_then(Value::as_struct).and_then(|t| t.get("A")),
            Some(&Value::Int(0))
        );

        let mut color = DynamicStruct::new(Some(builtin::COLOR));
        assert!(matches!(
            decoder.decode_struct(builtin::COLOR, &json!("xyz"), &mut color),
            Err(DecodeError::InvalidStructText { .. })
        ));
    }
}
