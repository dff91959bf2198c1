use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use vc_object::{ObjectError, PathTarget, SpawnParams, World};
use vc_reflect::info::ClassFlags;
use vc_reflect::{ObjectId, TypeHandle};

use super::graph::{GraphDeserializer, InstancedRecord};
use super::import::ReferenceImporter;
use super::{DeserializeError, NotifyReplay, Phase};
use crate::codec::ValueDecoder;
use crate::extend::ExtendDataContainer;
use crate::keys::{EXTEND_DATA, EXTEND_TYPE, OBJECT_CLASS, OBJECT_NAME, ObjectIdx, SUB_OBJECTS, parse_idx};

fn read_idx(json: Option<&JsonValue>) -> Option<ObjectIdx> {
    json?.as_i64().and_then(|v| ObjectIdx::try_from(v).ok())
}

impl<'d> GraphDeserializer<'d> {
    /// Runs every phase in order.
    pub fn load_all(&mut self, world: &mut World) -> Result<(), DeserializeError> {
        self.load_external_objects(world)?;
        self.instance_dynamic_objects(world)?;
        self.load_dynamic_object_data(world)?;
        self.finish_deferred_construction(world)?;
        self.replay_notifies(world)?;
        self.load_extend_data(world)
    }

    // -------------------------------------------------------------------------
    // 1. Externals

    /// Resolves the paths of `__ExternalObjects`.
    ///
    /// Paths that do not resolve are logged and load as null.
    pub fn load_external_objects(&mut self, world: &World) -> Result<(), DeserializeError> {
        self.expect_phase(Phase::Created)?;

        let document = self.document;
        for (idx, path) in document.external_objects() {
            match world.resolve_path(path) {
                Some(PathTarget::Object(object)) => {
                    self.table.objects.insert(idx, object);
                }
                Some(PathTarget::Type(ty)) => {
                    self.table.types.insert(idx, ty);
                }
                None => log::error!("external object {idx} `{path}` not found"),
            }
        }

        self.phase = Phase::ExternalsLoaded;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // 2. Instances

    /// Finds or creates the object of every record, sub-objects included.
    ///
    /// Actors are spawned deferred. Records with a class that does not
    /// resolve are skipped along with their sub-objects.
    pub fn instance_dynamic_objects(&mut self, world: &mut World) -> Result<(), DeserializeError> {
        self.expect_phase(Phase::ExternalsLoaded)?;

        let document = self.document;
        for (idx, record) in document.dynamic_objects() {
            self.instance_record(world, idx, record, None);
        }

        self.phase = Phase::Instanced;
        Ok(())
    }

    fn instance_record(
        &mut self,
        world: &mut World,
        idx: ObjectIdx,
        record: &'d Map<String, JsonValue>,
        parent: Option<ObjectId>,
    ) {
        if self.table.objects.contains_key(&idx) {
            log::error!("index {idx} is used by two records, the second is skipped");
            return;
        }

        let class = read_idx(record.get(OBJECT_CLASS))
            .and_then(|class_idx| self.table.types.get(&class_idx).copied())
            .filter(|&class| world.registry().class(class).is_some());
        let Some(class) = class else {
            log::error!("record {idx} has no loadable class, skipping it and its sub-objects");
            return;
        };

        let name = match self.name_overrides.get(&idx) {
            Some(name) => Some(name.clone()),
            None => record.get(OBJECT_NAME).and_then(JsonValue::as_str).map(Into::into),
        };

        let object = match self.find_or_create(world, class, name.as_deref(), parent) {
            Ok(object) => object,
            Err(e) => {
                log::error!("record {idx} could not be instanced: {e}");
                return;
            }
        };

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("record {idx} instanced as `{}`", world.path_of(object).unwrap_or_default());

        self.table.objects.insert(idx, object);
        self.instanced.push(InstancedRecord {
            idx,
            object,
            record,
            replay: NotifyReplay::new(object),
        });

        let Some(sub_objects) = record.get(SUB_OBJECTS).and_then(JsonValue::as_object) else {
            return;
        };
        for (key, sub) in sub_objects {
            match (parse_idx(key).filter(|&i| i > 0), sub.as_object()) {
                (Some(sub_idx), Some(sub)) => self.instance_record(world, sub_idx, sub, Some(object)),
                _ => log::error!("invalid sub-object `{key}` of record {idx}"),
            }
        }
    }

    /// Reuses a valid object of the same class and name, moving anything
    /// else with that name to the transient package.
    fn find_or_create(
        &mut self,
        world: &mut World,
        class: TypeHandle,
        name: Option<&str>,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, ObjectError> {
        let is_actor = world.registry().class_flags(class).contains(ClassFlags::ACTOR);
        let outer = match (is_actor, parent) {
            (true, Some(parent)) => world.level_of(parent).unwrap_or(self.outer),
            (true, None) => world.level_of(self.outer).unwrap_or(self.outer),
            (false, Some(parent)) => parent,
            (false, None) => self.outer,
        };

        if let Some(name) = name
            && let Some(existing) = world.find_object(Some(outer), name)
        {
            if world.is_valid(existing) && world.class_of(existing) == Some(class) {
                if is_actor && parent.is_some() {
                    world.set_owner(existing, parent)?;
                }
                return Ok(existing);
            }
            let transient = world.transient_package();
            let aside = world.make_unique_name(Some(transient), name);
            world.rename(existing, &aside, Some(transient))?;
        }

        if is_actor {
            let params = SpawnParams {
                name: name.map(Into::into),
                owner: parent,
                instigator: None,
            };
            let deferred = world.spawn_actor_deferred(class, outer, params)?;
            let object = deferred.id();
            self.deferred.push(deferred);
            self.spawned.push(object);
            Ok(object)
        } else {
            world.new_object(class, outer, name)
        }
    }

    // -------------------------------------------------------------------------
    // 3. Fields

    /// Loads the fields of every instanced object.
    ///
    /// Notifies of loaded fields are queued, not fired.
    pub fn load_dynamic_object_data(&mut self, world: &mut World) -> Result<(), DeserializeError> {
        self.expect_phase(Phase::Instanced)?;

        let registry = Arc::clone(world.registry());
        let filter = self.config.filter;

        for i in 0..self.instanced.len() {
            let InstancedRecord { idx, object, record, .. } = self.instanced[i];
            let (Some(class), Some(mut values)) = (world.class_of(object), world.fields(object).cloned()) else {
                continue;
            };

            let fields = registry.persisted_fields(class, filter);
            let mut queued = Vec::new();
            {
                let mut importer = ReferenceImporter {
                    table: &self.table,
                    world: &*world,
                };
                let mut decoder = ValueDecoder::with_processor(&registry, &mut importer)
                    .with_filter(filter)
                    .with_culture(&self.config.culture);
                for field in fields {
                    let Some(json) = record.get(field.name()) else {
                        continue;
                    };
                    match decoder.decode_field(field, json, &mut values) {
                        Ok(prior) => {
                            if let Some(notify) = field.notify() {
                                queued.push((notify, prior));
                            }
                        }
                        Err(e) => log::warn!("record {idx}: {e}"),
                    }
                }
            }

            if let Some(target) = world.fields_mut(object) {
                *target = values;
            }
            let replay = &mut self.instanced[i].replay;
            for (notify, prior) in queued {
                replay.queue(notify, prior);
            }
        }

        self.phase = Phase::DataLoaded;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // 4. Construction

    /// Finishes every actor spawned deferred in phase 2.
    pub fn finish_deferred_construction(&mut self, world: &mut World) -> Result<(), DeserializeError> {
        self.expect_phase(Phase::DataLoaded)?;

        for actor in core::mem::take(&mut self.deferred) {
            if let Err(e) = world.finish_spawning(actor) {
                log::error!("actor could not finish spawning: {e}");
            }
        }

        self.phase = Phase::ConstructionFinished;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // 5. Notifies

    /// Fires the queued notifies of objects without extend data.
    ///
    /// Objects with extend data and a factory for it are replayed in phase 6.
    pub fn replay_notifies(&mut self, world: &mut World) -> Result<(), DeserializeError> {
        self.expect_phase(Phase::ConstructionFinished)?;

        let extend = self.extend;
        for instanced in &self.instanced {
            let deferred = instanced.record.contains_key(EXTEND_DATA)
                && extend.find_for(world, instanced.object).is_some();
            if !deferred {
                instanced.replay.fire(world);
            }
        }

        self.phase = Phase::NotifiesReplayed;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // 6. Extend data

    /// Hands the `__ExtendData` of every object to its factory.
    ///
    /// Queued notifies are fired after the factory returns, unless the
    /// factory fired them itself. Extend data whose type does not resolve
    /// is skipped; the factory is not called.
    pub fn load_extend_data(&mut self, world: &mut World) -> Result<(), DeserializeError> {
        self.expect_phase(Phase::NotifiesReplayed)?;

        let registry = Arc::clone(world.registry());
        let extend = self.extend;

        for instanced in &self.instanced {
            let Some(json) = instanced.record.get(EXTEND_DATA).and_then(JsonValue::as_object) else {
                continue;
            };
            let object = instanced.object;
            let Some(factory) = extend.find_for(world, object) else {
                log::warn!("record {} has extend data but no factory", instanced.idx);
                instanced.replay.fire(world);
                continue;
            };

            let ty = read_idx(json.get(EXTEND_TYPE))
                .and_then(|type_idx| self.table.types.get(&type_idx).copied())
                .filter(|&ty| registry.struct_info(ty).is_some());
            let Some(ty) = ty else {
                log::error!("extend data of record {} has no loadable type", instanced.idx);
                instanced.replay.fire(world);
                continue;
            };

            let mut payload = registry.default_fields(ty).cloned().unwrap_or_default();
            let fields = registry.persisted_fields(ty, self.config.filter);
            let mut importer = ReferenceImporter {
                table: &self.table,
                world: &*world,
            };
            ValueDecoder::with_processor(&registry, &mut importer)
                .with_filter(self.config.filter)
                .with_culture(&self.config.culture)
                .decode_fields(&fields, json, &mut payload);
            let container = ExtendDataContainer::new(ty, payload);

            factory.post_load(world, object, &container, &instanced.replay);
            instanced.replay.fire(world);
        }

        self.phase = Phase::Finished;
        Ok(())
    }
}
