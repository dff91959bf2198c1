/// Identity of an object inside one document.
///
/// `0` is null, positive values are objects written inline,
/// negative values are entries of `__ExternalObjects`.
pub type ObjectIdx = i32;

pub const NULL_IDX: ObjectIdx = 0;

pub const EXTERNAL_OBJECTS: &str = "__ExternalObjects";
pub const DYNAMIC_OBJECTS: &str = "__DynamicObjects";
pub const SUB_OBJECTS: &str = "__SubObjects";
pub const EXTEND_DATA: &str = "__ExtendData";
pub const OBJECT_NAME: &str = "__Name";
pub const OBJECT_CLASS: &str = "__Class";
pub const EXTEND_TYPE: &str = "__Type";

/// Keys starting with `__` belong to the document format.
#[inline]
pub(crate) fn is_reserved(key: &str) -> bool {
    key.starts_with("__")
}

#[inline]
pub(crate) fn parse_idx(key: &str) -> Option<ObjectIdx> {
    key.parse().ok()
}
