//! Per-class callbacks.
//!
//! Hooks are looked up along the class hierarchy: construction and game-init
//! hooks of every class in the chain run base first, a notify resolves to the
//! most-derived class that declares it.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_reflect::hash::HashMap;
use vc_reflect::{ObjectId, Value};

use crate::World;

pub type ObjectFn = Arc<dyn Fn(&mut World, ObjectId) + Send + Sync>;

/// Receives the object and the field value before it was restored.
pub type NotifyFn = Arc<dyn Fn(&mut World, ObjectId, &Value) + Send + Sync>;

pub type PredicateFn = Arc<dyn Fn(&World, ObjectId) -> bool + Send + Sync>;

/// Callbacks registered for one class.
///
/// # Examples
///
/// ```
/// use vc_object::ClassHooks;
///
/// let hooks = ClassHooks::new()
///     .on_construct(|world, id| {
///         let _ = world.path_of(id);
///     })
///     .on_notify("OnRep_Health", |_world, _id, _prior| {});
///
/// assert!(hooks.notify("OnRep_Health").is_some());
/// ```
#[derive(Clone, Default)]
pub struct ClassHooks {
    construct: Option<ObjectFn>,
    game_init: Option<ObjectFn>,
    can_serialize: Option<PredicateFn>,
    notifies: HashMap<Box<str>, NotifyFn>,
}

impl ClassHooks {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once when construction finishes.
    pub fn on_construct(mut self, f: impl Fn(&mut World, ObjectId) + Send + Sync + 'static) -> Self {
        self.construct = Some(Arc::new(f));
        self
    }

    /// Runs when a level starts without save data.
    pub fn on_game_init(mut self, f: impl Fn(&mut World, ObjectId) + Send + Sync + 'static) -> Self {
        self.game_init = Some(Arc::new(f));
        self
    }

    /// Decides whether an instance is written to level saves.
    pub fn with_can_serialize(mut self, f: impl Fn(&World, ObjectId) -> bool + Send + Sync + 'static) -> Self {
        self.can_serialize = Some(Arc::new(f));
        self
    }

    pub fn on_notify(
        mut self,
        name: &str,
        f: impl Fn(&mut World, ObjectId, &Value) + Send + Sync + 'static,
    ) -> Self {
        self.notifies.insert(name.into(), Arc::new(f));
        self
    }

    #[inline]
    pub fn construct(&self) -> Option<&ObjectFn> {
        self.construct.as_ref()
    }

    #[inline]
    pub fn game_init(&self) -> Option<&ObjectFn> {
        self.game_init.as_ref()
    }

    #[inline]
    pub fn can_serialize(&self) -> Option<&PredicateFn> {
        self.can_serialize.as_ref()
    }

    #[inline]
    pub fn notify(&self, name: &str) -> Option<&NotifyFn> {
        self.notifies.get(name)
    }
}

impl fmt::Debug for ClassHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHooks")
            .field("construct", &self.construct.is_some())
            .field("game_init", &self.game_init.is_some())
            .field("can_serialize", &self.can_serialize.is_some())
            .field("notifies", &self.notifies.keys().collect::<Vec<_>>())
            .finish()
    }
}
