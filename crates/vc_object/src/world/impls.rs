use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use slotmap::SlotMap;
use vc_reflect::hash::HashMap;
use vc_reflect::{ObjectId, TypeHandle, TypeRegistry, builtin};

use crate::hooks::ClassHooks;
use crate::object::{ObjectData, ObjectFlags, ObjectState};

/// What an external path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTarget {
    Object(ObjectId),
    Type(TypeHandle),
}

/// A container of live objects sharing one [`TypeRegistry`].
pub struct World {
    pub(crate) registry: Arc<TypeRegistry>,
    pub(crate) objects: SlotMap<ObjectId, ObjectData>,
    pub(crate) roots: Vec<ObjectId>,
    pub(crate) transient: ObjectId,
    pub(crate) hooks: HashMap<TypeHandle, ClassHooks>,
    pub(crate) name_serial: u64,
}

impl Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("objects", &self.objects.len())
            .field("roots", &self.roots)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl World {
    /// Creates a world containing only the `/Transient` package.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        let mut objects = SlotMap::with_key();
        let fields = registry
            .default_fields(builtin::PACKAGE)
            .cloned()
            .unwrap_or_default();
        let transient = objects.insert(ObjectData {
            name: "Transient".into(),
            class: builtin::PACKAGE,
            outer: None,
            owner: None,
            instigator: None,
            flags: ObjectFlags::empty(),
            state: ObjectState::Live,
            fields,
            children: Vec::new(),
            components: Vec::new(),
        });

        Self {
            registry,
            objects,
            roots: alloc::vec![transient],
            transient,
            hooks: HashMap::default(),
            name_serial: 0,
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The package holding objects moved out of the way.
    #[inline]
    pub fn transient_package(&self) -> ObjectId {
        self.transient
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&ObjectData> {
        self.objects.get(id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Returns `true` if the object exists and is not pending destroy.
    #[inline]
    pub fn is_valid(&self, id: ObjectId) -> bool {
        self.objects.get(id).is_some_and(|o| !o.is_pending_destroy())
    }

    #[inline]
    pub fn class_of(&self, id: ObjectId) -> Option<TypeHandle> {
        self.objects.get(id).map(ObjectData::class)
    }

    /// Returns `true` if the object's class is `base` or derives from it.
    #[inline]
    pub fn is_a(&self, id: ObjectId, base: TypeHandle) -> bool {
        self.class_of(id)
            .is_some_and(|class| self.registry.is_child_of(class, base))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectData)> {
        self.objects.iter()
    }
}
