use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use vc_object::{DeferredActor, World};
use vc_reflect::hash::HashMap;
use vc_reflect::{DynamicStruct, ObjectId, TypeHandle};

use super::import::{IndexTable, ReferenceImporter};
use super::{DeserializeError, NotifyReplay, Phase};
use crate::codec::ValueDecoder;
use crate::config::DeserializeConfig;
use crate::document::SaveDocument;
use crate::extend::ExtendDataRegistry;
use crate::keys::{NULL_IDX, ObjectIdx};

/// An object created or reused for a record.
pub(super) struct InstancedRecord<'d> {
    pub idx: ObjectIdx,
    pub object: ObjectId,
    pub record: &'d Map<String, JsonValue>,
    pub replay: NotifyReplay,
}

// -----------------------------------------------------------------------------
// GraphDeserializer

/// Rebuilds the objects of a [`SaveDocument`] in phases.
///
/// 1. [`load_external_objects`](Self::load_external_objects)
/// 2. [`instance_dynamic_objects`](Self::instance_dynamic_objects)
/// 3. [`load_dynamic_object_data`](Self::load_dynamic_object_data)
/// 4. [`finish_deferred_construction`](Self::finish_deferred_construction)
/// 5. [`replay_notifies`](Self::replay_notifies)
/// 6. [`load_extend_data`](Self::load_extend_data)
///
/// Every object exists before any field is loaded, so references in any
/// direction resolve. Callers may run their own steps between phases;
/// [`load_all`](Self::load_all) runs them back to back.
///
/// Objects are created under `outer`; actors are spawned into the level
/// containing it.
pub struct GraphDeserializer<'d> {
    pub(super) document: &'d SaveDocument,
    pub(super) outer: ObjectId,
    pub(super) extend: &'d ExtendDataRegistry,
    pub(super) config: DeserializeConfig,
    pub(super) phase: Phase,
    pub(super) table: IndexTable,
    pub(super) instanced: Vec<InstancedRecord<'d>>,
    pub(super) deferred: Vec<DeferredActor>,
    pub(super) spawned: Vec<ObjectId>,
    pub(super) name_overrides: HashMap<ObjectIdx, String>,
}

impl<'d> GraphDeserializer<'d> {
    #[inline]
    pub fn new(document: &'d SaveDocument, outer: ObjectId, extend: &'d ExtendDataRegistry) -> Self {
        Self::with_config(document, outer, extend, DeserializeConfig::default())
    }

    pub fn with_config(
        document: &'d SaveDocument,
        outer: ObjectId,
        extend: &'d ExtendDataRegistry,
        config: DeserializeConfig,
    ) -> Self {
        Self {
            document,
            outer,
            extend,
            config,
            phase: Phase::Created,
            table: IndexTable::default(),
            instanced: Vec::new(),
            deferred: Vec::new(),
            spawned: Vec::new(),
            name_overrides: HashMap::default(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn config(&self) -> &DeserializeConfig {
        &self.config
    }

    pub(super) fn expect_phase(&self, expected: Phase) -> Result<(), DeserializeError> {
        if self.phase != expected {
            return Err(DeserializeError::PhaseOrder {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Instantiates the object of root field `field` under `name` instead of
    /// its saved name.
    ///
    /// Must be called before [`instance_dynamic_objects`](Self::instance_dynamic_objects).
    pub fn retarget_dynamic_object_name(&mut self, field: &str, name: impl Into<String>) -> Result<(), DeserializeError> {
        if self.phase >= Phase::Instanced {
            return Err(DeserializeError::PhaseOrder {
                expected: Phase::ExternalsLoaded,
                actual: self.phase,
            });
        }
        let idx = self.root_idx(field)?;
        if idx <= NULL_IDX {
            return Err(DeserializeError::InvalidRoot(field.into()));
        }
        self.name_overrides.insert(idx, name.into());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Results

    fn root(&self, field: &str) -> Result<&'d JsonValue, DeserializeError> {
        let document = self.document;
        document
            .get(field)
            .ok_or_else(|| DeserializeError::MissingRoot(field.into()))
    }

    fn root_idx(&self, field: &str) -> Result<ObjectIdx, DeserializeError> {
        self.root(field)?
            .as_i64()
            .and_then(|v| ObjectIdx::try_from(v).ok())
            .ok_or_else(|| DeserializeError::InvalidRoot(field.into()))
    }

    /// The live object of an index: `None` for null and unresolved indices.
    #[inline]
    pub fn object_by_idx(&self, idx: ObjectIdx) -> Option<ObjectId> {
        self.table.objects.get(&idx).copied()
    }

    /// The objects of a root field written by `add_objects`.
    pub fn objects(&self, field: &str) -> Result<Vec<Option<ObjectId>>, DeserializeError> {
        let items = self
            .root(field)?
            .as_array()
            .ok_or_else(|| DeserializeError::InvalidRoot(field.into()))?;
        items
            .iter()
            .map(|item| {
                item.as_i64()
                    .and_then(|v| ObjectIdx::try_from(v).ok())
                    .map(|idx| self.object_by_idx(idx))
                    .ok_or_else(|| DeserializeError::InvalidRoot(field.into()))
            })
            .collect()
    }

    /// The object of a root field written by `add_object`.
    pub fn object(&self, field: &str) -> Result<Option<ObjectId>, DeserializeError> {
        Ok(self.object_by_idx(self.root_idx(field)?))
    }

    /// Loads a root field written by `add_struct` onto the type's default.
    ///
    /// References resolve through the objects loaded so far.
    pub fn struct_value(&self, world: &World, field: &str, ty: TypeHandle) -> Result<DynamicStruct, DeserializeError> {
        let registry = world.registry();
        let mut value = registry
            .default_fields(ty)
            .filter(|_| registry.struct_info(ty).is_some())
            .cloned()
            .ok_or(DeserializeError::NotAStruct(ty))?;

        let json = self.root(field)?;
        let mut importer = ReferenceImporter {
            table: &self.table,
            world,
        };
        ValueDecoder::with_processor(registry, &mut importer)
            .with_filter(self.config.filter)
            .with_culture(&self.config.culture)
            .decode_struct(ty, json, &mut value)?;
        Ok(value)
    }

    /// Actors spawned by this deserializer, in spawn order.
    #[inline]
    pub fn spawned_actors(&self) -> &[ObjectId] {
        &self.spawned
    }

    /// Every object created or reused for a record, in document order.
    pub fn instanced_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.instanced.iter().map(|r| r.object)
    }
}
