//! Per-object storage.

use alloc::boxed::Box;
use alloc::vec::Vec;

use bitflags::bitflags;
use vc_reflect::{DynamicStruct, ObjectId, TypeHandle};

bitflags! {
    /// Runtime flags of a single object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectFlags: u32 {
        /// Loaded content, referenced by path instead of being saved inline.
        const ASSET           = 1 << 0;
        /// Destroyed, waiting for [`World::purge`](crate::World::purge).
        const PENDING_DESTROY = 1 << 1;
    }
}

/// Lifecycle of an object.
///
/// Actors stay `Constructing` between
/// [`World::spawn_actor_deferred`](crate::World::spawn_actor_deferred) and
/// [`World::finish_spawning`](crate::World::finish_spawning); every other
/// object is `Live` as soon as it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    Constructing,
    Live,
}

/// The data of one object.
#[derive(Debug, Clone)]
pub struct ObjectData {
    pub(crate) name: Box<str>,
    pub(crate) class: TypeHandle,
    pub(crate) outer: Option<ObjectId>,
    pub(crate) owner: Option<ObjectId>,
    pub(crate) instigator: Option<ObjectId>,
    pub(crate) flags: ObjectFlags,
    pub(crate) state: ObjectState,
    pub(crate) fields: DynamicStruct,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) components: Vec<ObjectId>,
}

impl ObjectData {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn class(&self) -> TypeHandle {
        self.class
    }

    /// The containing object. `None` for packages and levels.
    #[inline]
    pub fn outer(&self) -> Option<ObjectId> {
        self.outer
    }

    /// The logical owner of an actor.
    #[inline]
    pub fn owner(&self) -> Option<ObjectId> {
        self.owner
    }

    #[inline]
    pub fn instigator(&self) -> Option<ObjectId> {
        self.instigator
    }

    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    #[inline]
    pub fn state(&self) -> ObjectState {
        self.state
    }

    #[inline]
    pub fn fields(&self) -> &DynamicStruct {
        &self.fields
    }

    /// Objects whose outer is this object.
    #[inline]
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Components registered with this actor.
    #[inline]
    pub fn components(&self) -> &[ObjectId] {
        &self.components
    }

    #[inline]
    pub fn is_pending_destroy(&self) -> bool {
        self.flags.contains(ObjectFlags::PENDING_DESTROY)
    }
}
