use alloc::boxed::Box;

use bitflags::bitflags;

use crate::info::{ReflectKind, TypeHandle};
use crate::value::Value;

// -----------------------------------------------------------------------------
// FieldType

/// The declared type of a field, array element or map key/value.
///
/// Composite types refer to registered [`TypeInfo`](crate::info::TypeInfo)
/// through a [`TypeHandle`]. `Object` and `Class` carry the base class
/// that referenced objects (or classes) must derive from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    Text,
    Enum(TypeHandle),
    Array(Box<FieldType>),
    Set(Box<FieldType>),
    Map(Box<FieldType>, Box<FieldType>),
    Struct(TypeHandle),
    Object(TypeHandle),
    Class(TypeHandle),
}

impl FieldType {
    #[inline]
    pub fn array(element: FieldType) -> Self {
        Self::Array(Box::new(element))
    }

    #[inline]
    pub fn set(element: FieldType) -> Self {
        Self::Set(Box::new(element))
    }

    #[inline]
    pub fn map(key: FieldType, value: FieldType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Bool => ReflectKind::Bool,
            Self::Int => ReflectKind::Int,
            Self::Float => ReflectKind::Float,
            Self::String => ReflectKind::String,
            Self::Text => ReflectKind::Text,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Array(_) => ReflectKind::Array,
            Self::Set(_) => ReflectKind::Set,
            Self::Map(..) => ReflectKind::Map,
            Self::Struct(_) => ReflectKind::Struct,
            Self::Object(_) => ReflectKind::Object,
            Self::Class(_) => ReflectKind::Class,
        }
    }

    /// Visits every [`TypeHandle`] this type refers to, including nested ones.
    pub(crate) fn for_each_handle(&self, f: &mut impl FnMut(ReflectKind, TypeHandle)) {
        match self {
            Self::Enum(h) | Self::Struct(h) | Self::Object(h) | Self::Class(h) => f(self.kind(), *h),
            Self::Array(elem) | Self::Set(elem) => elem.for_each_handle(f),
            Self::Map(key, value) => {
                key.for_each_handle(f);
                value.for_each_handle(f);
            }
            _ => {}
        }
    }
}

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Property flags of a [`NamedField`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u32 {
        /// The field takes part in save games.
        const PERSISTENT = 1 << 0;
        /// Runtime-only state, never saved.
        const TRANSIENT  = 1 << 1;
        /// Kept for old data only.
        const DEPRECATED = 1 << 2;
        /// Not editable after construction. Informational.
        const CONST      = 1 << 3;
    }
}

impl Default for FieldFlags {
    #[inline]
    fn default() -> Self {
        Self::PERSISTENT
    }
}

// -----------------------------------------------------------------------------
// FieldFilter

/// Selects which fields are visited during (de)serialization.
///
/// A field passes if it has all `check` flags and none of the `skip` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFilter {
    pub check: FieldFlags,
    pub skip: FieldFlags,
}

impl FieldFilter {
    /// Persistent fields that are neither transient nor deprecated.
    pub const PERSISTENT: Self = Self {
        check: FieldFlags::PERSISTENT,
        skip: FieldFlags::TRANSIENT.union(FieldFlags::DEPRECATED),
    };

    /// Every field.
    pub const ALL: Self = Self {
        check: FieldFlags::empty(),
        skip: FieldFlags::empty(),
    };

    #[inline]
    pub const fn new(check: FieldFlags, skip: FieldFlags) -> Self {
        Self { check, skip }
    }

    #[inline]
    pub fn accepts(&self, flags: FieldFlags) -> bool {
        flags.contains(self.check) && !flags.intersects(self.skip)
    }
}

impl Default for FieldFilter {
    #[inline]
    fn default() -> Self {
        Self::PERSISTENT
    }
}

// -----------------------------------------------------------------------------
// NamedField

/// Information for a named field of a struct or class.
///
/// # Examples
///
/// ```
/// use vc_reflect::{FieldType, NamedField, Value};
///
/// let field = NamedField::new("Health", FieldType::Int)
///     .with_default(Value::Int(100))
///     .with_notify("OnRep_Health");
///
/// assert_eq!(field.name(), "Health");
/// assert_eq!(field.notify(), Some("OnRep_Health"));
/// ```
#[derive(Debug, Clone)]
pub struct NamedField {
    name: Box<str>,
    ty: FieldType,
    flags: FieldFlags,
    default: Option<Value>,
    notify: Option<Box<str>>,
}

impl NamedField {
    /// Creates a persistent field without an explicit default.
    pub fn new(name: impl Into<Box<str>>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            flags: FieldFlags::default(),
            default: None,
            notify: None,
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the value used by default instances.
    ///
    /// Without it, the zero value of the field type is used.
    #[inline]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Names the change-notification hook fired after this field is restored.
    #[inline]
    pub fn with_notify(mut self, notify: impl Into<Box<str>>) -> Self {
        self.notify = Some(notify.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[inline]
    pub fn notify(&self) -> Option<&str> {
        self.notify.as_deref()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FieldFilter, FieldFlags};

    #[test]
    fn default_filter() {
        let filter = FieldFilter::default();
        assert!(filter.accepts(FieldFlags::PERSISTENT));
        assert!(filter.accepts(FieldFlags::PERSISTENT | FieldFlags::CONST));
        assert!(!filter.accepts(FieldFlags::PERSISTENT | FieldFlags::TRANSIENT));
        assert!(!filter.accepts(FieldFlags::DEPRECATED | FieldFlags::PERSISTENT));
        assert!(!filter.accepts(FieldFlags::empty()));
        assert!(FieldFilter::ALL.accepts(FieldFlags::TRANSIENT));
    }
}
