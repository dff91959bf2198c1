//! Schema descriptors: [`TypeInfo`] and its components.

mod class_info;
mod enum_info;
mod field_info;
mod struct_info;
mod type_info;

pub use class_info::{ClassFlags, ClassInfo};
pub use enum_info::{EnumInfo, VariantInfo};
pub use field_info::{FieldFilter, FieldFlags, FieldType, NamedField};
pub use struct_info::StructInfo;
pub use type_info::{ReflectKind, ReflectKindError, TypeHandle, TypeInfo};
