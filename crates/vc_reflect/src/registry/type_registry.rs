use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::hash::HashMap;
use crate::info::{ClassFlags, ClassInfo, EnumInfo, StructInfo};
use crate::info::{FieldFilter, FieldType, NamedField, ReflectKind, TypeHandle, TypeInfo};
use crate::registry::builtin;
use crate::value::{DynamicStruct, Value};

// -----------------------------------------------------------------------------
// Error

/// Errors returned when registering a type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("type path `{0}` is already registered")]
    DuplicatePath(String),

    #[error("type path `{0}` is empty or contains `/`")]
    InvalidPath(String),

    #[error("field `{field}` of `{path}` uses the reserved `__` prefix")]
    ReservedFieldName { path: String, field: String },

    #[error("field `{field}` is declared twice in the hierarchy of `{path}`")]
    DuplicateField { path: String, field: String },

    #[error("field `{field}` of `{path}` refers to {handle}, which is not a registered {expected}")]
    InvalidFieldType {
        path: String,
        field: String,
        handle: TypeHandle,
        expected: ReflectKind,
    },

    #[error("default value of field `{field}` of `{path}` is not a {expected}")]
    InvalidDefault {
        path: String,
        field: String,
        expected: ReflectKind,
    },

    #[error("super class {handle} of `{path}` is not a registered class")]
    InvalidSuperClass { path: String, handle: TypeHandle },
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of saveable types.
///
/// This struct is used as the central store for type information and
/// the default instance of every struct and class.
///
/// Types can only refer to types registered before them; a class may
/// also refer to itself through `Object` and `Class` fields.
///
/// # Example
///
/// ```
/// use vc_reflect::{FieldType, NamedField, TypeRegistry, Value, builtin};
/// use vc_reflect::info::{ClassFlags, ClassInfo};
///
/// let mut registry = TypeRegistry::new();
/// let pawn = registry
///     .register_class(
///         ClassInfo::new("game.Pawn", Some(builtin::ACTOR))
///             .with_field(NamedField::new("Health", FieldType::Int).with_default(Value::Int(100))),
///     )
///     .unwrap();
///
/// assert!(registry.is_child_of(pawn, builtin::ACTOR));
/// assert!(registry.class_flags(pawn).contains(ClassFlags::ACTOR));
/// assert_eq!(registry.get_with_path("game.Pawn"), Some(pawn));
///
/// let defaults = registry.default_fields(pawn).unwrap();
/// assert_eq!(defaults.get("Health"), Some(&Value::Int(100)));
/// ```
pub struct TypeRegistry {
    types: Vec<TypeInfo>,
    defaults: Vec<DynamicStruct>,
    path_to_handle: HashMap<Box<str>, TypeHandle>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a type registry with the [built-in](builtin) types.
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            defaults: Vec::new(),
            path_to_handle: HashMap::default(),
        };
        registry.insert(TypeInfo::Class(builtin::object()));
        registry.insert(TypeInfo::Class(builtin::package()));
        registry.insert(TypeInfo::Class(builtin::level()));
        registry.insert(TypeInfo::Class(builtin::actor()));
        registry.insert(TypeInfo::Class(builtin::actor_component()));
        registry.insert(TypeInfo::Struct(builtin::color()));
        registry.insert(TypeInfo::Struct(builtin::date_time()));
        registry.insert(TypeInfo::Struct(builtin::actor_extend_data()));
        registry
    }

    #[inline]
    fn next_handle(&self) -> TypeHandle {
        TypeHandle::new(self.types.len() as u32)
    }

    // # Validity
    // The path must be unused and every referenced handle must be valid.
    fn insert(&mut self, mut info: TypeInfo) -> TypeHandle {
        let handle = self.next_handle();

        let defaults = match &mut info {
            TypeInfo::Struct(info) => self.make_defaults(handle, None, info.fields()),
            TypeInfo::Enum(_) => DynamicStruct::new(Some(handle)),
            TypeInfo::Class(info) => {
                if let Some(super_class) = info.super_class() {
                    info.inherit_flags(self.class_flags(super_class));
                }
                self.make_defaults(handle, info.super_class(), info.fields())
            }
        };

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("registered type `{}` as {handle}", info.path());

        self.path_to_handle.insert(info.path().into(), handle);
        self.types.push(info);
        self.defaults.push(defaults);
        handle
    }

    fn make_defaults(
        &self,
        handle: TypeHandle,
        super_class: Option<TypeHandle>,
        fields: &[NamedField],
    ) -> DynamicStruct {
        let mut defaults = super_class
            .and_then(|h| self.defaults.get(h.index()))
            .cloned()
            .unwrap_or_default();
        defaults.set_represented_type(Some(handle));

        for field in fields {
            let value = match field.default_value() {
                Some(value) => value.clone(),
                None => self.default_value(field.ty()),
            };
            defaults.insert(field.name(), value);
        }
        defaults
    }

    fn check_path(&self, path: &str) -> Result<(), RegistryError> {
        if path.is_empty() || path.contains('/') {
            return Err(RegistryError::InvalidPath(path.into()));
        }
        if self.path_to_handle.contains_key(path) {
            return Err(RegistryError::DuplicatePath(path.into()));
        }
        Ok(())
    }

    fn check_fields(&self, path: &str, fields: &[NamedField], is_class: bool) -> Result<(), RegistryError> {
        let next = self.next_handle();

        for field in fields {
            let name = field.name();
            if name.starts_with("__") {
                return Err(RegistryError::ReservedFieldName {
                    path: path.into(),
                    field: name.into(),
                });
            }

            let mut result = Ok(());
            field.ty().for_each_handle(&mut |kind, handle| {
                if result.is_err() {
                    return;
                }
                let expected = match kind {
                    ReflectKind::Object | ReflectKind::Class => ReflectKind::Class,
                    other => other,
                };
                let self_reference = is_class && expected == ReflectKind::Class && handle == next;
                let valid = self_reference || self.get(handle).is_some_and(|info| info.kind() == expected);
                if !valid {
                    result = Err(RegistryError::InvalidFieldType {
                        path: path.into(),
                        field: name.into(),
                        handle,
                        expected,
                    });
                }
            });
            result?;

            if let Some(default) = field.default_value()
                && default.kind() != field.ty().kind()
            {
                return Err(RegistryError::InvalidDefault {
                    path: path.into(),
                    field: name.into(),
                    expected: field.ty().kind(),
                });
            }
        }
        Ok(())
    }

    /// Registers a struct type.
    pub fn register_struct(&mut self, info: StructInfo) -> Result<TypeHandle, RegistryError> {
        self.check_path(info.path())?;
        self.check_fields(info.path(), info.fields(), false)?;
        Ok(self.insert(TypeInfo::Struct(info)))
    }

    /// Registers an enum type.
    pub fn register_enum(&mut self, info: EnumInfo) -> Result<TypeHandle, RegistryError> {
        self.check_path(info.path())?;
        Ok(self.insert(TypeInfo::Enum(info)))
    }

    /// Registers a class. Its super class must already be registered.
    ///
    /// Inheritable [`ClassFlags`] of the super class are added to the new class.
    pub fn register_class(&mut self, info: ClassInfo) -> Result<TypeHandle, RegistryError> {
        self.check_path(info.path())?;

        if let Some(super_class) = info.super_class() {
            if self.class(super_class).is_none() {
                return Err(RegistryError::InvalidSuperClass {
                    path: info.path().into(),
                    handle: super_class,
                });
            }
            let inherited = self.default_fields(super_class);
            if let Some(field) = info
                .fields()
                .iter()
                .find(|f| inherited.is_some_and(|d| d.contains(f.name())))
            {
                return Err(RegistryError::DuplicateField {
                    path: info.path().into(),
                    field: field.name().into(),
                });
            }
        }

        self.check_fields(info.path(), info.fields(), true)?;
        Ok(self.insert(TypeInfo::Class(info)))
    }

    // -------------------------------------------------------------------------
    // Lookup

    #[inline]
    pub fn get(&self, handle: TypeHandle) -> Option<&TypeInfo> {
        self.types.get(handle.index())
    }

    /// Returns the handle of the type with the given path, e.g. `"game.Pawn"`.
    #[inline]
    pub fn get_with_path(&self, path: &str) -> Option<TypeHandle> {
        self.path_to_handle.get(path).copied()
    }

    #[inline]
    pub fn path_of(&self, handle: TypeHandle) -> Option<&str> {
        self.get(handle).map(TypeInfo::path)
    }

    #[inline]
    pub fn struct_info(&self, handle: TypeHandle) -> Option<&StructInfo> {
        self.get(handle)?.as_struct().ok()
    }

    #[inline]
    pub fn enum_info(&self, handle: TypeHandle) -> Option<&EnumInfo> {
        self.get(handle)?.as_enum().ok()
    }

    #[inline]
    pub fn class(&self, handle: TypeHandle) -> Option<&ClassInfo> {
        self.get(handle)?.as_class().ok()
    }

    /// Flags of a class, including inherited ones. Empty for other types.
    #[inline]
    pub fn class_flags(&self, handle: TypeHandle) -> ClassFlags {
        self.class(handle).map(ClassInfo::flags).unwrap_or_default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeHandle, &TypeInfo)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, info)| (TypeHandle::new(i as u32), info))
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    /// Iterates a class and its super classes, most-derived first.
    ///
    /// Yields nothing for types that are not classes.
    pub fn super_chain(&self, handle: TypeHandle) -> impl Iterator<Item = TypeHandle> + '_ {
        let first = self.class(handle).map(|_| handle);
        core::iter::successors(first, |&h| self.class(h).and_then(ClassInfo::super_class))
    }

    /// Returns `true` if `child` is `base` or derives from it.
    pub fn is_child_of(&self, child: TypeHandle, base: TypeHandle) -> bool {
        self.super_chain(child).any(|h| h == base)
    }

    // -------------------------------------------------------------------------
    // Fields

    /// Fields of a struct or class passing `filter`.
    ///
    /// For classes, inherited fields come first.
    pub fn persisted_fields(&self, handle: TypeHandle, filter: FieldFilter) -> Vec<&NamedField> {
        match self.get(handle) {
            Some(TypeInfo::Struct(info)) => info
                .fields()
                .iter()
                .filter(|f| filter.accepts(f.flags()))
                .collect(),
            Some(TypeInfo::Class(_)) => {
                let mut chain: Vec<TypeHandle> = self.super_chain(handle).collect();
                chain.reverse();
                chain
                    .into_iter()
                    .filter_map(|h| self.class(h))
                    .flat_map(ClassInfo::fields)
                    .filter(|f| filter.accepts(f.flags()))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// The default instance of a struct, or the class default object's fields.
    #[inline]
    pub fn default_fields(&self, handle: TypeHandle) -> Option<&DynamicStruct> {
        match self.get(handle)? {
            TypeInfo::Enum(_) => None,
            _ => self.defaults.get(handle.index()),
        }
    }

    /// The zero value of a field type.
    ///
    /// Structs default to their registered default instance,
    /// enums to their first variant.
    pub fn default_value(&self, ty: &FieldType) -> Value {
        match ty {
            FieldType::Bool => Value::Bool(false),
            FieldType::Int => Value::Int(0),
            FieldType::Float => Value::Float(0.0),
            FieldType::String => Value::String(String::new()),
            FieldType::Text => Value::Text(String::new()),
            FieldType::Enum(h) => Value::Enum(self.enum_info(*h).map_or(0, EnumInfo::first_value)),
            FieldType::Array(_) => Value::Array(Vec::new()),
            FieldType::Set(_) => Value::Set(Vec::new()),
            FieldType::Map(..) => Value::Map(Vec::new()),
            FieldType::Struct(h) => Value::Struct(
                self.default_fields(*h)
                    .cloned()
                    .unwrap_or_else(|| DynamicStruct::new(Some(*h))),
            ),
            FieldType::Object(_) => Value::Object(None),
            FieldType::Class(_) => Value::Class(None),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
