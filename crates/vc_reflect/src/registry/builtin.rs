//! Types registered by [`TypeRegistry::new`](crate::TypeRegistry::new).
//!
//! The handles are stable because built-ins are always registered first,
//! in this order.

use crate::info::{ClassFlags, ClassInfo, FieldType, NamedField, StructInfo, TypeHandle};
use crate::text::{ColorFormat, DateTimeFormat};
use crate::value::Value;

/// `core.Object`, the root of every class hierarchy.
pub const OBJECT: TypeHandle = TypeHandle::new(0);
/// `core.Package`, an outermost container of objects.
pub const PACKAGE: TypeHandle = TypeHandle::new(1);
/// `core.Level`, a package holding actors.
pub const LEVEL: TypeHandle = TypeHandle::new(2);
/// `core.Actor`.
pub const ACTOR: TypeHandle = TypeHandle::new(3);
/// `core.ActorComponent`.
pub const ACTOR_COMPONENT: TypeHandle = TypeHandle::new(4);
/// `core.Color`, RGBA channels exported as hex.
pub const COLOR: TypeHandle = TypeHandle::new(5);
/// `core.DateTime`, ticks exported as ISO-8601.
pub const DATE_TIME: TypeHandle = TypeHandle::new(6);
/// `core.ActorExtendData`, the owner and instigator backlinks of an actor.
pub const ACTOR_EXTEND_DATA: TypeHandle = TypeHandle::new(7);

pub(super) fn object() -> ClassInfo {
    ClassInfo::new("core.Object", None)
}

pub(super) fn package() -> ClassInfo {
    ClassInfo::new("core.Package", Some(OBJECT))
}

pub(super) fn level() -> ClassInfo {
    ClassInfo::new("core.Level", Some(PACKAGE))
}

pub(super) fn actor() -> ClassInfo {
    ClassInfo::new("core.Actor", Some(OBJECT)).with_flags(ClassFlags::ACTOR)
}

pub(super) fn actor_component() -> ClassInfo {
    ClassInfo::new("core.ActorComponent", Some(OBJECT)).with_flags(ClassFlags::COMPONENT)
}

pub(super) fn color() -> StructInfo {
    let channel = |name: &str, default: i64| {
        NamedField::new(name, FieldType::Int).with_default(Value::Int(default))
    };
    StructInfo::new("core.Color")
        .with_field(channel("R", 0))
        .with_field(channel("G", 0))
        .with_field(channel("B", 0))
        .with_field(channel("A", 255))
        .with_text_format(ColorFormat)
}

pub(super) fn date_time() -> StructInfo {
    StructInfo::new("core.DateTime")
        .with_field(NamedField::new("Ticks", FieldType::Int))
        .with_text_format(DateTimeFormat)
}

pub(super) fn actor_extend_data() -> StructInfo {
    StructInfo::new("core.ActorExtendData")
        .with_field(NamedField::new("Owner", FieldType::Object(ACTOR)))
        .with_field(NamedField::new("Instigator", FieldType::Object(ACTOR)))
}
