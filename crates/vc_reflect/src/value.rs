//! Dynamic values shaped by registered schemas.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{ReflectKind, TypeHandle};

slotmap::new_key_type! {
    /// Identity of a live object in a world.
    pub struct ObjectId;
}

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed field value.
///
/// Maps and sets keep insertion order. Equality is structural, so two maps
/// with the same entries in a different order are not equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Text(String),
    Enum(i64),
    Array(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Struct(DynamicStruct),
    Object(Option<ObjectId>),
    Class(Option<TypeHandle>),
}

macro_rules! impl_as_copy {
    ($name:ident : $variant:ident => $ty:ty) => {
        #[inline]
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Self::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

impl Value {
    impl_as_copy!(as_bool: Bool => bool);
    impl_as_copy!(as_int: Int => i64);
    impl_as_copy!(as_float: Float => f64);
    impl_as_copy!(as_enum: Enum => i64);
    impl_as_copy!(as_object: Object => Option<ObjectId>);
    impl_as_copy!(as_class: Class => Option<TypeHandle>);

    /// Returns the string content of a `String` or `Text` value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of an `Array` or `Set` value.
    #[inline]
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) | Self::Set(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_struct(&self) -> Option<&DynamicStruct> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_struct_mut(&mut self) -> Option<&mut DynamicStruct> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Bool(_) => ReflectKind::Bool,
            Self::Int(_) => ReflectKind::Int,
            Self::Float(_) => ReflectKind::Float,
            Self::String(_) => ReflectKind::String,
            Self::Text(_) => ReflectKind::Text,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Array(_) => ReflectKind::Array,
            Self::Set(_) => ReflectKind::Set,
            Self::Map(_) => ReflectKind::Map,
            Self::Struct(_) => ReflectKind::Struct,
            Self::Object(_) => ReflectKind::Object,
            Self::Class(_) => ReflectKind::Class,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<DynamicStruct> for Value {
    #[inline]
    fn from(value: DynamicStruct) -> Self {
        Self::Struct(value)
    }
}

// -----------------------------------------------------------------------------
// DynamicStruct

/// A list of named fields, optionally tagged with the type it represents.
///
/// # Examples
///
/// ```
/// use vc_reflect::{DynamicStruct, Value};
///
/// let mut data = DynamicStruct::default();
/// data.insert("Level", Value::Int(3));
/// data.insert("Level", Value::Int(4));
///
/// assert_eq!(data.field_len(), 1);
/// assert_eq!(data.get("Level"), Some(&Value::Int(4)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicStruct {
    represented: Option<TypeHandle>,
    fields: Vec<(Box<str>, Value)>,
}

impl DynamicStruct {
    #[inline]
    pub const fn new(represented: Option<TypeHandle>) -> Self {
        Self {
            represented,
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn represented_type(&self) -> Option<TypeHandle> {
        self.represented
    }

    #[inline]
    pub fn set_represented_type(&mut self, represented: Option<TypeHandle>) {
        self.represented = represented;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| &**n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| v)
    }

    /// Inserts or replaces a field, returning the previous value.
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        match self.get_mut(name) {
            Some(slot) => Some(core::mem::replace(slot, value)),
            None => {
                self.fields.push((name.into(), value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(n, _)| &**n == name)?;
        Some(self.fields.remove(index).1)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (&**n, v))
    }

    /// Builder form of [`insert`](Self::insert).
    #[inline]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }
}
