use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::keys::{DYNAMIC_OBJECTS, EXTERNAL_OBJECTS, ObjectIdx, parse_idx};

// -----------------------------------------------------------------------------
// DocumentError

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("The document root is not a JSON object")]
    NotAnObject,

    #[error("The document has no `{0}` table")]
    MissingTable(&'static str),

    #[error("`{0}` is not a JSON object")]
    InvalidTable(&'static str),

    #[error("`{key}` is not a valid index for `{table}`")]
    InvalidIndex { table: &'static str, key: String },

    #[error("External object `{0}` has no path")]
    InvalidExternalPath(String),
}

// -----------------------------------------------------------------------------
// SaveDocument

/// The JSON object produced by a [`GraphSerializer`](crate::GraphSerializer).
///
/// ```json
/// {
///   "__ExternalObjects": { "-1": "/Game/Items/Sword", "-2": "game.Player" },
///   "__DynamicObjects": {
///     "1": { "__Name": "Player_0", "__Class": -2, "Health": 50, "__SubObjects": { ... } }
///   },
///   "Players": [1]
/// }
/// ```
///
/// Documents from any source are validated on construction: both tables
/// must exist, external indices are negative and dynamic indices positive.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDocument {
    root: Map<String, JsonValue>,
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SaveDocument {
    /// An empty document with both tables.
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert(EXTERNAL_OBJECTS.into(), JsonValue::Object(Map::new()));
        root.insert(DYNAMIC_OBJECTS.into(), JsonValue::Object(Map::new()));
        Self { root }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_slice(json: &[u8]) -> Result<Self, DocumentError> {
        Self::from_value(serde_json::from_slice(json)?)
    }

    pub fn from_value(json: JsonValue) -> Result<Self, DocumentError> {
        let JsonValue::Object(root) = json else {
            return Err(DocumentError::NotAnObject);
        };
        let document = Self { root };
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), DocumentError> {
        for (key, path) in self.required_table(EXTERNAL_OBJECTS)? {
            if !parse_idx(key).is_some_and(|idx| idx < 0) {
                return Err(DocumentError::InvalidIndex {
                    table: EXTERNAL_OBJECTS,
                    key: key.clone(),
                });
            }
            if !path.as_str().is_some_and(|p| !p.is_empty()) {
                return Err(DocumentError::InvalidExternalPath(key.clone()));
            }
        }
        for key in self.required_table(DYNAMIC_OBJECTS)?.keys() {
            if !parse_idx(key).is_some_and(|idx| idx > 0) {
                return Err(DocumentError::InvalidIndex {
                    table: DYNAMIC_OBJECTS,
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }

    fn required_table(&self, name: &'static str) -> Result<&Map<String, JsonValue>, DocumentError> {
        self.root
            .get(name)
            .ok_or(DocumentError::MissingTable(name))?
            .as_object()
            .ok_or(DocumentError::InvalidTable(name))
    }

    // -------------------------------------------------------------------------
    // Access

    /// `(index, path)` pairs of `__ExternalObjects`.
    pub fn external_objects(&self) -> impl Iterator<Item = (ObjectIdx, &str)> {
        self.table(EXTERNAL_OBJECTS).filter_map(|(key, path)| {
            let idx = parse_idx(key)?;
            Some((idx, path.as_str()?))
        })
    }

    /// `(index, record)` pairs of the top-level `__DynamicObjects` records.
    pub fn dynamic_objects(&self) -> impl Iterator<Item = (ObjectIdx, &Map<String, JsonValue>)> {
        self.table(DYNAMIC_OBJECTS).filter_map(|(key, record)| {
            let idx = parse_idx(key)?;
            Some((idx, record.as_object()?))
        })
    }

    fn table(&self, name: &str) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.root
            .get(name)
            .and_then(JsonValue::as_object)
            .into_iter()
            .flatten()
    }

    /// A root field written by `add_*`.
    #[inline]
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.root.get(field)
    }

    #[inline]
    pub fn as_json(&self) -> &Map<String, JsonValue> {
        &self.root
    }

    #[inline]
    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.root)
    }

    #[inline]
    pub(crate) fn insert_root(&mut self, field: String, value: JsonValue) {
        self.root.insert(field, value);
    }

    // -------------------------------------------------------------------------
    // Output

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&self.root)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(serde_json::to_vec(&self.root)?)
    }

    pub fn to_vec_pretty(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(serde_json::to_vec_pretty(&self.root)?)
    }
}
