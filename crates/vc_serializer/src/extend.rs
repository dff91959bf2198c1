//! Per-class auxiliary data saved next to an object's reflected fields.
//!
//! A factory registered for a class is asked for an [`ExtendDataContainer`]
//! when an object of that class (or a subclass) is written, and gets the
//! decoded container back after the object is loaded.

use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_object::World;
use vc_reflect::hash::HashMap;
use vc_reflect::{DynamicStruct, ObjectId, TypeHandle, TypeRegistry, Value, builtin};

use crate::de::NotifyReplay;

// -----------------------------------------------------------------------------
// ExtendDataContainer

/// A typed payload. Invalid (and not written) if it has no type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendDataContainer {
    type_ref: Option<TypeHandle>,
    payload: DynamicStruct,
}

impl ExtendDataContainer {
    /// A container of struct type `ty`.
    #[inline]
    pub fn new(ty: TypeHandle, mut payload: DynamicStruct) -> Self {
        payload.set_represented_type(Some(ty));
        Self {
            type_ref: Some(ty),
            payload,
        }
    }

    #[inline]
    pub fn invalid() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.type_ref.is_some()
    }

    #[inline]
    pub fn type_ref(&self) -> Option<TypeHandle> {
        self.type_ref
    }

    #[inline]
    pub fn payload(&self) -> &DynamicStruct {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut DynamicStruct {
        &mut self.payload
    }
}

// -----------------------------------------------------------------------------
// ExtendDataFactory

/// Captures and restores the extend data of one class hierarchy.
pub trait ExtendDataFactory: Send + Sync {
    /// Returns an invalid container to write nothing.
    fn pre_save(&self, world: &World, object: ObjectId) -> ExtendDataContainer;

    /// Restores `data` onto a loaded object.
    ///
    /// `replay` holds the change notifications queued while the object's
    /// fields were loaded. Fire it when the restored state is ready;
    /// it is fired after this call otherwise.
    fn post_load(&self, world: &mut World, object: ObjectId, data: &ExtendDataContainer, replay: &NotifyReplay);
}

// -----------------------------------------------------------------------------
// ExtendDataRegistry

/// Maps classes to their [`ExtendDataFactory`].
///
/// # Examples
///
/// ```
/// use vc_reflect::{TypeRegistry, builtin};
/// use vc_serializer::ExtendDataRegistry;
///
/// let registry = TypeRegistry::new();
/// let extend = ExtendDataRegistry::with_defaults();
///
/// assert!(extend.find(&registry, builtin::ACTOR).is_some());
/// assert!(extend.find(&registry, builtin::ACTOR_COMPONENT).is_none());
/// ```
#[derive(Default, Clone)]
pub struct ExtendDataRegistry {
    factories: HashMap<TypeHandle, Arc<dyn ExtendDataFactory>>,
}

impl core::fmt::Debug for ExtendDataRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExtendDataRegistry")
            .field("classes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtendDataRegistry {
    /// An empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with [`ActorExtendDataFactory`] registered for actors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(builtin::ACTOR, ActorExtendDataFactory);
        registry
    }

    /// Registers `factory` for `class` and its subclasses, replacing the
    /// previous factory of `class`.
    pub fn register(&mut self, class: TypeHandle, factory: impl ExtendDataFactory + 'static) {
        self.factories.insert(class, Arc::new(factory));
    }

    pub fn unregister(&mut self, class: TypeHandle) -> Option<Arc<dyn ExtendDataFactory>> {
        self.factories.remove(&class)
    }

    /// The factory of the most-derived class in the hierarchy of `class`.
    pub fn find(&self, registry: &TypeRegistry, class: TypeHandle) -> Option<&Arc<dyn ExtendDataFactory>> {
        registry
            .super_chain(class)
            .find_map(|h| self.factories.get(&h))
    }

    /// The factory for a live object.
    pub fn find_for(&self, world: &World, object: ObjectId) -> Option<&Arc<dyn ExtendDataFactory>> {
        self.find(world.registry(), world.class_of(object)?)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

// -----------------------------------------------------------------------------
// ActorExtendDataFactory

/// Saves the logical owner and instigator of an actor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActorExtendDataFactory;

const OWNER: &str = "Owner";
const INSTIGATOR: &str = "Instigator";

impl ExtendDataFactory for ActorExtendDataFactory {
    fn pre_save(&self, world: &World, object: ObjectId) -> ExtendDataContainer {
        let payload = DynamicStruct::default()
            .with(OWNER, Value::Object(world.owner(object)))
            .with(INSTIGATOR, Value::Object(world.instigator(object)));
        ExtendDataContainer::new(builtin::ACTOR_EXTEND_DATA, payload)
    }

    fn post_load(&self, world: &mut World, object: ObjectId, data: &ExtendDataContainer, replay: &NotifyReplay) {
        let read = |name: &str| data.payload().get(name).and_then(Value::as_object).flatten();

        if let Err(e) = world.set_owner(object, read(OWNER)) {
            log::warn!("cannot restore the owner: {e}");
        }
        if let Err(e) = world.set_instigator(object, read(INSTIGATOR)) {
            log::warn!("cannot restore the instigator: {e}");
        }
        replay.fire(world);
    }
}
