use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Value as JsonValue};
use vc_reflect::FieldFilter;

// -----------------------------------------------------------------------------
// Culture

/// The locale used to pick a translation out of a localized text object.
///
/// # Examples
///
/// ```
/// use vc_serializer::Culture;
///
/// let culture = Culture::new("zh-Hans-CN");
/// assert_eq!(culture.prioritized_names(), ["zh-Hans-CN", "zh-Hans", "zh"]);
/// assert_eq!(culture.language(), "zh");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Culture {
    name: Cow<'static, str>,
}

impl Culture {
    pub const ENGLISH: Self = Self {
        name: Cow::Borrowed("en"),
    };

    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base language, e.g. `zh` for `zh-Hans-CN`.
    #[inline]
    pub fn language(&self) -> &str {
        self.name.split('-').next().unwrap_or_default()
    }

    /// The culture followed by its parents, most specific first.
    pub fn prioritized_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut current: &str = &self.name;
        loop {
            names.push(current.to_string());
            match current.rfind('-') {
                Some(end) => current = &current[..end],
                None => break,
            }
        }
        names
    }

    /// Picks a translation from an object keyed by locale tag.
    ///
    /// Tries the prioritized names, then any tag with the same base language.
    pub fn select_text<'j>(&self, translations: &'j Map<String, JsonValue>) -> Option<&'j str> {
        for name in self.prioritized_names() {
            let found = translations
                .iter()
                .find(|(tag, _)| tag.eq_ignore_ascii_case(&name))
                .and_then(|(_, text)| text.as_str());
            if found.is_some() {
                return found;
            }
        }

        let language = self.language();
        translations
            .iter()
            .filter(|(tag, _)| {
                tag.split('-')
                    .next()
                    .is_some_and(|l| l.eq_ignore_ascii_case(language))
            })
            .find_map(|(_, text)| text.as_str())
    }
}

impl Default for Culture {
    #[inline]
    fn default() -> Self {
        Self::ENGLISH
    }
}

// -----------------------------------------------------------------------------
// Configs

/// Options of a [`GraphSerializer`](crate::GraphSerializer).
#[derive(Debug, Clone, Default)]
pub struct SerializeConfig {
    /// Fields written for every object and struct.
    pub filter: FieldFilter,
    /// Fail instead of writing a path when a referenced object is not
    /// owned by any object being serialized.
    pub strict_ownership: bool,
}

/// Options of a [`GraphDeserializer`](crate::GraphDeserializer).
#[derive(Debug, Clone, Default)]
pub struct DeserializeConfig {
    /// Fields read for every object and struct.
    pub filter: FieldFilter,
    /// Locale used for localized text.
    pub culture: Culture,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Culture;

    #[test]
    fn locale_fallback() {
        let text = json!({ "en": "Sword", "zh-Hans": "剑", "fr-CA": "Épée" });
        let text = text.as_object().unwrap();

        assert_eq!(Culture::new("zh-Hans-CN").select_text(text), Some("剑"));
        assert_eq!(Culture::new("EN-us").select_text(text), Some("Sword"));
        assert_eq!(Culture::new("fr-FR").select_text(text), Some("Épée"));
        assert_eq!(Culture::new("de").select_text(text), None);
    }
}
