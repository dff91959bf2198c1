use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use vc_object::ObjectFlags;
use vc_reflect::info::ClassFlags;
use vc_reflect::{FieldType, ObjectId, TypeHandle, Value, builtin};

use super::graph::{ChainEntry, GraphSerializer, RecordNode};
use crate::codec::{EncodeError, ExportProcessor, ValueEncoder};
use crate::keys::{EXTEND_TYPE, NULL_IDX, ObjectIdx};

impl GraphSerializer<'_> {
    // -------------------------------------------------------------------------
    // Indices

    /// Valid objects that are not assets.
    pub(super) fn is_dynamic(&self, object: ObjectId) -> bool {
        self.world
            .get(object)
            .is_some_and(|o| !o.is_pending_destroy() && !o.flags().contains(ObjectFlags::ASSET))
    }

    /// The object a record is nested under, and whether that is a logical
    /// owner rather than the outer.
    ///
    /// Actors with an owner are placed under the owner, not under their level.
    pub(super) fn placement_owner(&self, object: ObjectId) -> Option<(ObjectId, bool)> {
        let data = self.world.get(object)?;
        let is_actor = self.registry.class_flags(data.class()).contains(ClassFlags::ACTOR);
        match data.owner() {
            Some(owner) if is_actor => Some((owner, true)),
            _ => data.outer().map(|outer| (outer, false)),
        }
    }

    /// Assigns the next dynamic index and opens an empty record.
    pub(super) fn new_record(&mut self, object: ObjectId) -> usize {
        let world = self.world;
        let (name, class) = world
            .get(object)
            .map_or_else(|| (String::new(), builtin::OBJECT), |o| (o.name().into(), o.class()));

        let idx = self.records.len() as ObjectIdx + 1;
        let previous = self.object_index.insert(object, idx);
        debug_assert!(previous.is_none(), "object indexed twice");

        let class_idx = self.external_type(class);
        self.records.push(RecordNode {
            idx,
            name,
            class_idx,
            fields: Map::new(),
            extend: None,
            sub_objects: Vec::new(),
        });

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("record {idx} opened for `{}`", world.path_of(object).unwrap_or_default());

        self.records.len() - 1
    }

    fn next_external(&self) -> ObjectIdx {
        -(self.externals.len() as ObjectIdx) - 1
    }

    /// The external index of a type, recording its path once.
    pub(super) fn external_type(&mut self, ty: TypeHandle) -> ObjectIdx {
        if let Some(&idx) = self.type_index.get(&ty) {
            return idx;
        }
        let idx = self.next_external();
        let path = self.registry.path_of(ty).unwrap_or_default().into();
        self.externals.push((idx, path));
        self.type_index.insert(ty, idx);
        idx
    }

    /// The external index of an object, recording its path once.
    pub(super) fn external_object(&mut self, object: ObjectId) -> ObjectIdx {
        if let Some(&idx) = self.object_index.get(&object) {
            return idx;
        }
        let idx = self.next_external();
        let path = self.world.path_of(object).unwrap_or_default();
        self.externals.push((idx, path));
        self.object_index.insert(object, idx);
        idx
    }

    // -------------------------------------------------------------------------
    // Resolution

    /// Resolves a root: unlike references, roots not reached through an
    /// open owner get a record of their own.
    pub(super) fn resolve_root(&mut self, root: Option<ObjectId>) -> Result<ObjectIdx, EncodeError> {
        let Some(object) = root else {
            return Ok(NULL_IDX);
        };
        if let Some(&idx) = self.object_index.get(&object) {
            return Ok(idx);
        }
        if !self.world.is_valid(object) {
            log::warn!("destroyed root object written as null");
            return Ok(NULL_IDX);
        }
        if !self.is_dynamic(object) {
            return Ok(self.external_object(object));
        }

        let parent = self.placement_owner(object).and_then(|(owner, _)| {
            let idx = *self.object_index.get(&owner)?;
            (idx > 0).then(|| ChainEntry {
                object: owner,
                record: idx as usize - 1,
            })
        });

        let record = self.new_record(object);
        match parent {
            Some(parent) => {
                self.records[parent.record].sub_objects.push(record);
                self.chain.push(parent);
                let result = self.expand(object, record);
                self.chain.pop();
                result?;
            }
            None => {
                self.top_level.push(record);
                self.expand(object, record)?;
            }
        }
        Ok(self.records[record].idx)
    }

    /// Resolves a reference found while writing fields.
    ///
    /// 1. null and destroyed objects are `0`
    /// 2. indexed objects reuse their index
    /// 3. assets are external
    /// 4. objects owned by an open record are nested under it
    /// 5. anything else is external, or an error with `strict_ownership`
    pub(super) fn resolve_object(&mut self, object: Option<ObjectId>) -> Result<ObjectIdx, EncodeError> {
        let Some(object) = object else {
            return Ok(NULL_IDX);
        };
        if let Some(&idx) = self.object_index.get(&object) {
            return Ok(idx);
        }

        let world = self.world;
        let Some(data) = world.get(object).filter(|o| !o.is_pending_destroy()) else {
            log::warn!("reference to a destroyed object written as null");
            return Ok(NULL_IDX);
        };
        if data.flags().contains(ObjectFlags::ASSET) {
            return Ok(self.external_object(object));
        }

        if let Some((owner, logical)) = self.placement_owner(object)
            && let Some(parent) = self.chain.iter().rev().find(|e| e.object == owner).copied()
        {
            if logical {
                self.check_owner_name(object, owner);
            }
            let record = self.new_record(object);
            self.records[parent.record].sub_objects.push(record);
            self.expand(object, record)?;
            return Ok(self.records[record].idx);
        }

        let path = world.path_of(object).unwrap_or_default();
        if self.config.strict_ownership {
            return Err(EncodeError::UnresolvedOwner { path });
        }
        log::warn!("`{path}` is not owned by any object being written, saved as a path");
        Ok(self.external_object(object))
    }

    /// Loading relies on owned actors carrying their owner's name.
    pub(super) fn check_owner_name(&self, object: ObjectId, owner: ObjectId) {
        let (Some(child), Some(parent)) = (self.world.get(object), self.world.get(owner)) else {
            return;
        };
        if !child.name().contains(parent.name()) {
            log::error!(
                "owned actor `{}` does not contain the name of its owner `{}`",
                child.name(),
                parent.name()
            );
            #[cfg(feature = "debug")]
            debug_assert!(false, "owned actor name does not contain its owner name");
        }
    }

    // -------------------------------------------------------------------------
    // Expansion

    /// Writes the fields and extend data of an object into its record.
    ///
    /// Extend data equal to its type default is not written.
    pub(super) fn expand(&mut self, object: ObjectId, record: usize) -> Result<(), EncodeError> {
        debug_assert!(
            self.chain.iter().all(|e| e.object != object),
            "object expanded while already open"
        );
        self.chain.push(ChainEntry { object, record });
        let result = self.write_record(object, record);
        self.chain.pop();
        result
    }

    fn write_record(&mut self, object: ObjectId, record: usize) -> Result<(), EncodeError> {
        let world = self.world;
        let extend = self.extend;
        let registry = Arc::clone(&self.registry);
        let filter = self.config.filter;

        let (Some(class), Some(values)) = (world.class_of(object), world.fields(object)) else {
            return Ok(());
        };

        let fields = registry.persisted_fields(class, filter);
        let mut out = Map::new();
        ValueEncoder::with_processor(&registry, self)
            .with_filter(filter)
            .encode_fields(&fields, values, registry.default_fields(class), &mut out)?;
        self.records[record].fields = out;

        let Some(factory) = extend.find(&registry, class) else {
            return Ok(());
        };
        let container = factory.pre_save(world, object);
        let Some(ty) = container.type_ref() else {
            return Ok(());
        };

        let mut payload = Map::new();
        let fields = registry.persisted_fields(ty, filter);
        let all_default = ValueEncoder::with_processor(&registry, self)
            .with_filter(filter)
            .encode_fields(&fields, container.payload(), registry.default_fields(ty), &mut payload)?;
        if all_default {
            return Ok(());
        }

        let mut out = Map::new();
        out.insert(EXTEND_TYPE.into(), JsonValue::from(self.external_type(ty)));
        out.append(&mut payload);
        self.records[record].extend = Some(out);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// References

impl ExportProcessor for GraphSerializer<'_> {
    fn try_export(&mut self, ty: &FieldType, value: &Value) -> Option<Result<JsonValue, EncodeError>> {
        match (ty, value) {
            (FieldType::Object(_), Value::Object(object)) => Some(self.resolve_object(*object).map(JsonValue::from)),
            (FieldType::Class(_), Value::Class(class)) => {
                let idx = class.map_or(NULL_IDX, |h| self.external_type(h));
                Some(Ok(JsonValue::from(idx)))
            }
            _ => None,
        }
    }
}
