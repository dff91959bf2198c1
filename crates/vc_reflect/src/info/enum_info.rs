use alloc::boxed::Box;
use alloc::vec::Vec;

/// A single named variant of an [`EnumInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    name: Box<str>,
    value: i64,
}

impl VariantInfo {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }
}

/// A container for a C-like enum: named variants with integer values.
///
/// Values are saved by variant name.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::EnumInfo;
///
/// let info = EnumInfo::new("game.Team")
///     .with_variant("Red", 0)
///     .with_variant("Blue", 4);
///
/// assert_eq!(info.value_of("Blue"), Some(4));
/// assert_eq!(info.name_of(0), Some("Red"));
/// assert_eq!(info.name_of(1), None);
/// ```
#[derive(Debug, Clone)]
pub struct EnumInfo {
    path: Box<str>,
    variants: Vec<VariantInfo>,
}

impl EnumInfo {
    pub fn new(path: impl Into<Box<str>>) -> Self {
        Self {
            path: path.into(),
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, name: impl Into<Box<str>>, value: i64) -> Self {
        self.variants.push(VariantInfo {
            name: name.into(),
            value,
        });
        self
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.value == value)
            .map(VariantInfo::name)
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.variants.iter().find(|v| &*v.name == name).map(|v| v.value)
    }

    /// The value of the first variant, or `0` for an empty enum.
    pub fn first_value(&self) -> i64 {
        self.variants.first().map_or(0, |v| v.value)
    }
}
