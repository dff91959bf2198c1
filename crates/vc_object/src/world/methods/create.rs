use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_reflect::info::ClassFlags;
use vc_reflect::{ObjectId, TypeHandle, builtin};

use crate::ObjectError;
use crate::object::{ObjectData, ObjectFlags, ObjectState};
use crate::world::World;

// -----------------------------------------------------------------------------
// SpawnParams

/// Optional parameters of an actor spawn.
#[derive(Debug, Clone, Default)]
pub struct SpawnParams {
    pub name: Option<String>,
    pub owner: Option<ObjectId>,
    pub instigator: Option<ObjectId>,
}

impl SpawnParams {
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_owner(mut self, owner: Option<ObjectId>) -> Self {
        self.owner = owner;
        self
    }

    #[inline]
    pub fn with_instigator(mut self, instigator: Option<ObjectId>) -> Self {
        self.instigator = instigator;
        self
    }
}

// -----------------------------------------------------------------------------
// DeferredActor

/// An actor whose construction has not finished yet.
///
/// The actor exists and is addressable, so references to it can be
/// resolved, but its construction hooks have not run. The only way to
/// consume this token is [`World::finish_spawning`].
#[derive(Debug)]
#[must_use = "deferred actors must be passed to `World::finish_spawning`"]
pub struct DeferredActor {
    id: ObjectId,
}

impl DeferredActor {
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

// -----------------------------------------------------------------------------
// Creation

impl World {
    fn class_path(&self, class: TypeHandle) -> String {
        self.registry.path_of(class).unwrap_or("<unknown>").into()
    }

    pub(crate) fn check_name(name: &str) -> Result<(), ObjectError> {
        if name.is_empty() || name.contains('/') {
            return Err(ObjectError::InvalidName(name.into()));
        }
        Ok(())
    }

    fn insert_object(
        &mut self,
        class: TypeHandle,
        outer: Option<ObjectId>,
        name: Option<&str>,
        state: ObjectState,
    ) -> Result<ObjectId, ObjectError> {
        let registry = Arc::clone(&self.registry);
        let info = registry.class(class).ok_or(ObjectError::NotAClass(class))?;
        if info.flags().contains(ClassFlags::ABSTRACT) {
            return Err(ObjectError::AbstractClass(info.path().into()));
        }
        if let Some(outer) = outer
            && !self.is_valid(outer)
        {
            return Err(ObjectError::NotFound(outer));
        }

        let name = match name {
            Some(name) => {
                Self::check_name(name)?;
                if self.find_object(outer, name).is_some() {
                    return Err(ObjectError::NameTaken {
                        name: name.into(),
                        outer: outer.and_then(|o| self.path_of(o)).unwrap_or_default(),
                    });
                }
                name.into()
            }
            None => {
                let base = info.path().rsplit_once('.').map_or(info.path(), |(_, n)| n);
                self.make_unique_name(outer, base)
            }
        };

        let mut flags = ObjectFlags::empty();
        if info.flags().contains(ClassFlags::ASSET) {
            flags |= ObjectFlags::ASSET;
        }

        let id = self.objects.insert(ObjectData {
            name: name.into_boxed_str(),
            class,
            outer,
            owner: None,
            instigator: None,
            flags,
            state,
            fields: registry.default_fields(class).cloned().unwrap_or_default(),
            children: Vec::new(),
            components: Vec::new(),
        });

        match outer {
            Some(outer) => self.objects[outer].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Returns `base_N` for the first serial `N` not used by a sibling.
    pub fn make_unique_name(&mut self, outer: Option<ObjectId>, base: &str) -> String {
        loop {
            self.name_serial += 1;
            let candidate = format!("{base}_{}", self.name_serial);
            if self.find_object(outer, &candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Creates an outermost package.
    pub fn create_package(&mut self, name: &str) -> Result<ObjectId, ObjectError> {
        self.insert_object(builtin::PACKAGE, None, Some(name), ObjectState::Live)
    }

    /// Creates an empty level.
    pub fn create_level(&mut self, name: &str) -> Result<ObjectId, ObjectError> {
        self.insert_object(builtin::LEVEL, None, Some(name), ObjectState::Live)
    }

    /// Creates a non-actor object under `outer` and runs its construction hooks.
    ///
    /// Components must be created under an actor and are registered with it.
    pub fn new_object(
        &mut self,
        class: TypeHandle,
        outer: ObjectId,
        name: Option<&str>,
    ) -> Result<ObjectId, ObjectError> {
        let flags = self.registry.class_flags(class);
        if flags.contains(ClassFlags::ACTOR) {
            return Err(ObjectError::ActorClass(self.class_path(class)));
        }
        if flags.contains(ClassFlags::COMPONENT) && !self.is_a(outer, builtin::ACTOR) {
            return Err(ObjectError::ComponentOuter(self.class_path(class)));
        }

        let id = self.insert_object(class, Some(outer), name, ObjectState::Live)?;
        if flags.contains(ClassFlags::COMPONENT) {
            self.objects[outer].components.push(id);
        }
        self.run_construct(id);
        Ok(id)
    }

    /// Creates an object that is always saved as a path reference.
    pub fn new_asset(
        &mut self,
        class: TypeHandle,
        outer: ObjectId,
        name: &str,
    ) -> Result<ObjectId, ObjectError> {
        let id = self.new_object(class, outer, Some(name))?;
        self.objects[id].flags |= ObjectFlags::ASSET;
        Ok(id)
    }

    /// Spawns an actor into `level` without running its construction hooks.
    ///
    /// Unnamed actors with an owner get a name starting with the owner's name.
    pub fn spawn_actor_deferred(
        &mut self,
        class: TypeHandle,
        level: ObjectId,
        params: SpawnParams,
    ) -> Result<DeferredActor, ObjectError> {
        if !self.registry.class_flags(class).contains(ClassFlags::ACTOR) {
            return Err(ObjectError::NotAnActorClass(self.class_path(class)));
        }
        if !self.is_a(level, builtin::LEVEL) {
            return Err(ObjectError::NotALevel(level));
        }
        for linked in [params.owner, params.instigator].into_iter().flatten() {
            if !self.is_valid(linked) {
                return Err(ObjectError::NotFound(linked));
            }
        }

        let name = match (params.name, params.owner) {
            (Some(name), _) => name,
            (None, Some(owner)) => {
                let short = self.registry.get(class).map_or("Actor", |info| info.short_name());
                let base = format!("{}_{short}", self.objects[owner].name);
                self.make_unique_name(Some(level), &base)
            }
            (None, None) => {
                let short = self.registry.get(class).map_or("Actor", |info| info.short_name());
                let short: String = short.into();
                self.make_unique_name(Some(level), &short)
            }
        };

        let id = self.insert_object(class, Some(level), Some(&name), ObjectState::Constructing)?;
        let data = &mut self.objects[id];
        data.owner = params.owner;
        data.instigator = params.instigator;
        Ok(DeferredActor { id })
    }

    /// Finishes a deferred spawn and runs the construction hooks once.
    pub fn finish_spawning(&mut self, actor: DeferredActor) -> Result<ObjectId, ObjectError> {
        let id = actor.id;
        let data = self.objects.get_mut(id).ok_or(ObjectError::NotFound(id))?;
        if data.state == ObjectState::Live {
            log::warn!("actor `{}` finished spawning twice", data.name);
            return Ok(id);
        }
        data.state = ObjectState::Live;
        self.run_construct(id);
        Ok(id)
    }

    /// Spawns a fully constructed actor.
    #[inline]
    pub fn spawn_actor(
        &mut self,
        class: TypeHandle,
        level: ObjectId,
        params: SpawnParams,
    ) -> Result<ObjectId, ObjectError> {
        let deferred = self.spawn_actor_deferred(class, level, params)?;
        self.finish_spawning(deferred)
    }
}
