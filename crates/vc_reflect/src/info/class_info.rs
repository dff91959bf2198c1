use alloc::boxed::Box;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::info::{NamedField, TypeHandle};

bitflags! {
    /// Class flags. They are inherited by subclasses on registration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u32 {
        /// Instances live in a level and use deferred construction.
        const ACTOR     = 1 << 0;
        /// Instances are created under an actor and registered with it.
        const COMPONENT = 1 << 1;
        /// Instances are loaded content, always saved as a path.
        const ASSET     = 1 << 2;
        /// Level save managers pick up instances of this class.
        const SAVE_GAME = 1 << 3;
        /// The class itself cannot be instantiated. Not inherited.
        const ABSTRACT  = 1 << 4;
    }
}

impl ClassFlags {
    /// Flags passed from a super class to its subclasses.
    pub const INHERITED: Self = Self::ACTOR
        .union(Self::COMPONENT)
        .union(Self::ASSET)
        .union(Self::SAVE_GAME);
}

/// A container for class info: an object type with single inheritance.
///
/// Fields are only the ones declared by this class.
/// Use [`TypeRegistry::persisted_fields`] for the full, inherited list.
///
/// [`TypeRegistry::persisted_fields`]: crate::registry::TypeRegistry::persisted_fields
#[derive(Debug, Clone)]
pub struct ClassInfo {
    path: Box<str>,
    super_class: Option<TypeHandle>,
    flags: ClassFlags,
    fields: Vec<NamedField>,
}

impl ClassInfo {
    pub fn new(path: impl Into<Box<str>>, super_class: Option<TypeHandle>) -> Self {
        Self {
            path: path.into(),
            super_class,
            flags: ClassFlags::empty(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn with_field(mut self, field: NamedField) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn super_class(&self) -> Option<TypeHandle> {
        self.super_class
    }

    #[inline]
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    pub(crate) fn inherit_flags(&mut self, super_flags: ClassFlags) {
        self.flags |= super_flags & ClassFlags::INHERITED;
    }
}
