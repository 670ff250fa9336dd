//! Localization: message lookup with raw-string fallback.
//!
//! - `catalog` - Per-language message tables and the current language
//! - `language` - Persisted language selection synchronized with the catalog

mod catalog;
mod language;

pub use catalog::{Catalog, DEFAULT_LOCALE};
pub use language::{LanguageSync, RTL_LOCALES};

#[cfg_attr(test, mockall::automock)]
pub trait Localizer: Send + Sync {
    /// Returns the localized text for `key`, or `None` if there is none.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Localizes `key`, falling back to the key itself.
pub fn translate(localizer: &dyn Localizer, key: &str) -> String {
    localizer
        .lookup(key)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| key.to_string())
}

/// Localizer for contexts without translations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalizer;

impl Localizer for NoLocalizer {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}
