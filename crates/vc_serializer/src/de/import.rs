use alloc::string::ToString;

use serde_json::Value as JsonValue;
use vc_object::World;
use vc_reflect::hash::HashMap;
use vc_reflect::{FieldType, ObjectId, TypeHandle, Value};

use crate::codec::{DecodeError, ImportProcessor};
use crate::keys::{NULL_IDX, ObjectIdx};

// -----------------------------------------------------------------------------
// IndexTable

/// Live objects and types by document index.
#[derive(Debug, Default)]
pub(super) struct IndexTable {
    pub objects: HashMap<ObjectIdx, ObjectId>,
    pub types: HashMap<ObjectIdx, TypeHandle>,
}

// -----------------------------------------------------------------------------
// ReferenceImporter

/// Reads indices back into references.
///
/// References that do not resolve, or resolve to an object or class of the
/// wrong type, load as null.
pub(super) struct ReferenceImporter<'a> {
    pub table: &'a IndexTable,
    pub world: &'a World,
}

impl ReferenceImporter<'_> {
    fn object(&self, idx: ObjectIdx, base: TypeHandle) -> Option<ObjectId> {
        if idx == NULL_IDX {
            return None;
        }
        let Some(&object) = self.table.objects.get(&idx) else {
            log::warn!("index {idx} did not resolve to an object, loaded as null");
            return None;
        };
        if !self.world.is_a(object, base) {
            log::error!(
                "`{}` is not a `{}`, loaded as null",
                self.world.path_of(object).unwrap_or_default(),
                self.world.registry().path_of(base).unwrap_or_default()
            );
            return None;
        }
        Some(object)
    }

    fn class(&self, idx: ObjectIdx, base: TypeHandle) -> Option<TypeHandle> {
        if idx == NULL_IDX {
            return None;
        }
        let registry = self.world.registry();
        let Some(&class) = self.table.types.get(&idx) else {
            log::warn!("index {idx} did not resolve to a class, loaded as null");
            return None;
        };
        if !registry.is_child_of(class, base) {
            log::error!(
                "`{}` is not a subclass of `{}`, loaded as null",
                registry.path_of(class).unwrap_or_default(),
                registry.path_of(base).unwrap_or_default()
            );
            return None;
        }
        Some(class)
    }
}

fn read_idx(json: &JsonValue) -> Result<ObjectIdx, DecodeError> {
    json.as_i64()
        .and_then(|v| ObjectIdx::try_from(v).ok())
        .ok_or_else(|| DecodeError::InvalidIndex(json.to_string()))
}

impl ImportProcessor for ReferenceImporter<'_> {
    fn try_import(&mut self, ty: &FieldType, json: &JsonValue) -> Option<Result<Value, DecodeError>> {
        let base = match ty {
            FieldType::Object(base) | FieldType::Class(base) => *base,
            _ => return None,
        };
        let idx = match read_idx(json) {
            Ok(idx) => idx,
            Err(e) => return Some(Err(e)),
        };
        Some(Ok(match ty {
            FieldType::Object(_) => Value::Object(self.object(idx, base)),
            _ => Value::Class(self.class(idx, base)),
        }))
    }
}
