use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use vc_object::World;
use vc_reflect::hash::HashMap;
use vc_reflect::{DynamicStruct, ObjectId, TypeHandle, TypeRegistry};

use super::SerializeError;
use crate::codec::ValueEncoder;
use crate::config::SerializeConfig;
use crate::document::SaveDocument;
use crate::extend::ExtendDataRegistry;
use crate::keys::{
    DYNAMIC_OBJECTS, EXTEND_DATA, EXTERNAL_OBJECTS, OBJECT_CLASS, OBJECT_NAME, ObjectIdx, SUB_OBJECTS,
    is_reserved,
};

// -----------------------------------------------------------------------------
// Records

/// A dynamic object being written.
///
/// Records are stored in index order: the record of index `i` is at `i - 1`.
pub(super) struct RecordNode {
    pub idx: ObjectIdx,
    pub name: String,
    pub class_idx: ObjectIdx,
    pub fields: Map<String, JsonValue>,
    pub extend: Option<Map<String, JsonValue>>,
    pub sub_objects: Vec<usize>,
}

/// An object whose record is open on the owner chain.
#[derive(Clone, Copy)]
pub(super) struct ChainEntry {
    pub object: ObjectId,
    pub record: usize,
}

// -----------------------------------------------------------------------------
// GraphSerializer

/// Writes a set of root objects and structs into one [`SaveDocument`].
///
/// Each `add_*` call writes one root field. Objects are written once, the
/// first time they are reached; later references reuse their index.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use vc_object::{SpawnParams, World};
/// use vc_reflect::{TypeRegistry, builtin};
/// use vc_serializer::{ExtendDataRegistry, GraphSerializer};
///
/// let mut world = World::new(Arc::new(TypeRegistry::new()));
/// let level = world.create_level("Arena").unwrap();
/// let actor = world.spawn_actor(builtin::ACTOR, level, SpawnParams::named("Crate")).unwrap();
///
/// let extend = ExtendDataRegistry::new();
/// let mut ser = GraphSerializer::new(&world, &extend);
/// ser.add_objects("Actors", &[Some(actor)]).unwrap();
///
/// let document = ser.finish();
/// assert_eq!(document.get("Actors").unwrap(), &serde_json::json!([1]));
/// ```
pub struct GraphSerializer<'w> {
    pub(super) world: &'w World,
    pub(super) registry: Arc<TypeRegistry>,
    pub(super) extend: &'w ExtendDataRegistry,
    pub(super) config: SerializeConfig,
    pub(super) object_index: HashMap<ObjectId, ObjectIdx>,
    pub(super) type_index: HashMap<TypeHandle, ObjectIdx>,
    pub(super) externals: Vec<(ObjectIdx, String)>,
    pub(super) records: Vec<RecordNode>,
    pub(super) top_level: Vec<usize>,
    pub(super) chain: Vec<ChainEntry>,
    roots: Map<String, JsonValue>,
}

impl<'w> GraphSerializer<'w> {
    #[inline]
    pub fn new(world: &'w World, extend: &'w ExtendDataRegistry) -> Self {
        Self::with_config(world, extend, SerializeConfig::default())
    }

    pub fn with_config(world: &'w World, extend: &'w ExtendDataRegistry, config: SerializeConfig) -> Self {
        Self {
            world,
            registry: Arc::clone(world.registry()),
            extend,
            config,
            object_index: HashMap::default(),
            type_index: HashMap::default(),
            externals: Vec::new(),
            records: Vec::new(),
            top_level: Vec::new(),
            chain: Vec::new(),
            roots: Map::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &SerializeConfig {
        &self.config
    }

    /// The index assigned to an object so far.
    #[inline]
    pub fn index_of(&self, object: ObjectId) -> Option<ObjectIdx> {
        self.object_index.get(&object).copied()
    }

    // -------------------------------------------------------------------------
    // Roots

    fn check_field(field: &str) -> Result<(), SerializeError> {
        if is_reserved(field) {
            return Err(SerializeError::ReservedField(field.into()));
        }
        Ok(())
    }

    /// Writes `roots` as an array of indices under `field`.
    ///
    /// Every root is indexed before any is expanded, so references between
    /// roots of one call are written as dynamic indices. A root whose owner
    /// is another root of the same call is nested under that owner's record.
    pub fn add_objects(&mut self, field: &str, roots: &[Option<ObjectId>]) -> Result<(), SerializeError> {
        Self::check_field(field)?;

        let mut reserved = Vec::new();
        let mut owned = Vec::new();
        for &root in roots.iter().flatten() {
            if self.object_index.contains_key(&root) || !self.is_dynamic(root) {
                continue;
            }
            match self.placement_owner(root) {
                Some((owner, logical)) if roots.contains(&Some(owner)) => owned.push((root, owner, logical)),
                _ => {
                    let record = self.new_record(root);
                    self.top_level.push(record);
                    reserved.push((root, record));
                }
            }
        }

        // Outermost owners first: a root is placed once its owner has a record.
        loop {
            let pending = owned.len();
            owned.retain(|&(root, owner, logical)| {
                if self.object_index.contains_key(&root) {
                    return false;
                }
                let Some(idx) = self.object_index.get(&owner).copied().filter(|&idx| idx > 0) else {
                    return true;
                };
                if logical {
                    self.check_owner_name(root, owner);
                }
                let record = self.new_record(root);
                self.records[idx as usize - 1].sub_objects.push(record);
                reserved.push((root, record));
                false
            });
            if owned.len() == pending {
                break;
            }
        }
        for (root, _, _) in owned {
            if self.object_index.contains_key(&root) {
                continue;
            }
            log::warn!("owner of a root is not written, root saved at the top level");
            let record = self.new_record(root);
            self.top_level.push(record);
            reserved.push((root, record));
        }

        for (root, record) in reserved {
            self.expand(root, record)?;
        }

        let mut indices = Vec::with_capacity(roots.len());
        for &root in roots {
            indices.push(JsonValue::from(self.resolve_root(root)?));
        }
        self.roots.insert(field.into(), JsonValue::Array(indices));
        Ok(())
    }

    /// Writes a single object index under `field`.
    pub fn add_object(&mut self, field: &str, root: Option<ObjectId>) -> Result<(), SerializeError> {
        Self::check_field(field)?;
        let idx = self.resolve_root(root)?;
        self.roots.insert(field.into(), JsonValue::from(idx));
        Ok(())
    }

    /// Writes a struct under `field`, diffed against `default` or, if `None`,
    /// against the type's default instance.
    ///
    /// Object references inside the struct are indexed like any other.
    pub fn add_struct(
        &mut self,
        field: &str,
        ty: TypeHandle,
        value: &DynamicStruct,
        default: Option<&DynamicStruct>,
    ) -> Result<(), SerializeError> {
        Self::check_field(field)?;
        let registry = Arc::clone(&self.registry);
        if registry.struct_info(ty).is_none() {
            return Err(SerializeError::NotAStruct(ty));
        }

        let default = default.or_else(|| registry.default_fields(ty));
        let filter = self.config.filter;
        let (json, _) = ValueEncoder::with_processor(&registry, self)
            .with_filter(filter)
            .encode_struct(ty, value, default)?;
        self.roots.insert(field.into(), json);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Output

    /// Builds the document.
    pub fn finish(self) -> SaveDocument {
        let Self {
            externals,
            mut records,
            top_level,
            roots,
            ..
        } = self;

        let mut document = SaveDocument::new();

        let mut external_table = Map::new();
        for (idx, path) in externals {
            external_table.insert(idx.to_string(), JsonValue::String(path));
        }
        document.insert_root(EXTERNAL_OBJECTS.into(), JsonValue::Object(external_table));

        let mut dynamic_table = Map::new();
        for record in top_level {
            let idx = records[record].idx;
            dynamic_table.insert(idx.to_string(), emit_record(&mut records, record));
        }
        document.insert_root(DYNAMIC_OBJECTS.into(), JsonValue::Object(dynamic_table));

        for (field, value) in roots {
            document.insert_root(field, value);
        }
        document
    }
}

/// `__Name`, `__Class`, fields, `__ExtendData`, then `__SubObjects`.
fn emit_record(records: &mut [RecordNode], record: usize) -> JsonValue {
    let node = &mut records[record];
    let mut out = Map::new();
    out.insert(OBJECT_NAME.into(), JsonValue::String(core::mem::take(&mut node.name)));
    out.insert(OBJECT_CLASS.into(), JsonValue::from(node.class_idx));
    out.append(&mut node.fields);
    if let Some(extend) = node.extend.take() {
        out.insert(EXTEND_DATA.into(), JsonValue::Object(extend));
    }

    let sub_objects = core::mem::take(&mut node.sub_objects);
    if !sub_objects.is_empty() {
        let mut table = Map::new();
        for sub in sub_objects {
            let idx = records[sub].idx;
            table.insert(idx.to_string(), emit_record(records, sub));
        }
        out.insert(SUB_OBJECTS.into(), JsonValue::Object(table));
    }
    JsonValue::Object(out)
}
