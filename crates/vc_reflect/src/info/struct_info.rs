use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::hash::HashMap;
use crate::info::NamedField;
use crate::text::TextFormat;

/// A container for compile-time named struct info.
///
/// # Examples
///
/// ```
/// use vc_reflect::{FieldType, NamedField};
/// use vc_reflect::info::StructInfo;
///
/// let info = StructInfo::new("game.Stats")
///     .with_field(NamedField::new("Level", FieldType::Int))
///     .with_field(NamedField::new("Name", FieldType::String));
///
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.index_of("Name"), Some(1));
/// ```
pub struct StructInfo {
    path: Box<str>,
    fields: Vec<NamedField>,
    field_indices: HashMap<Box<str>, usize>,
    text_format: Option<Arc<dyn TextFormat>>,
}

impl StructInfo {
    pub fn new(path: impl Into<Box<str>>) -> Self {
        Self {
            path: path.into(),
            fields: Vec::new(),
            field_indices: HashMap::default(),
            text_format: None,
        }
    }

    /// Appends a field. A field with an existing name replaces the old one.
    pub fn with_field(mut self, field: NamedField) -> Self {
        match self.field_indices.get(field.name()) {
            Some(&index) => self.fields[index] = field,
            None => {
                self.field_indices.insert(field.name().into(), self.fields.len());
                self.fields.push(field);
            }
        }
        self
    }

    /// Exports values of this struct as a single string.
    pub fn with_text_format(mut self, format: impl TextFormat + 'static) -> Self {
        self.text_format = Some(Arc::new(format));
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.field_indices.get(name).map(|&i| &self.fields[i])
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn text_format(&self) -> Option<&dyn TextFormat> {
        self.text_format.as_deref()
    }
}

impl fmt::Debug for StructInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructInfo")
            .field("path", &self.path)
            .field("fields", &self.fields)
            .field("text_format", &self.text_format.is_some())
            .finish()
    }
}
