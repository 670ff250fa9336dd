use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::watch;

use super::Localizer;

/// Language used when nothing else is selected.
pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN_CATALOG: &str = r#"{
    "defaultLocale": "en",
    "locales": {
        "en": {},
        "ar": {
            "Unauthorized. Please log in again.": "غير مصرح. يرجى تسجيل الدخول مرة أخرى.",
            "Forbidden. You don't have access.": "ممنوع. ليس لديك صلاحية الوصول.",
            "Not found.": "غير موجود.",
            "An unexpected error occurred.": "حدث خطأ غير متوقع."
        }
    }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default)]
    default_locale: Option<String>,
    locales: HashMap<String, HashMap<String, String>>,
}

/// Message tables for every supported language plus the current language.
///
/// Changing the language notifies every receiver obtained from
/// [`Catalog::subscribe`].
#[derive(Debug)]
pub struct Catalog {
    messages: HashMap<String, HashMap<String, String>>,
    default_locale: String,
    current: watch::Sender<String>,
}

impl Catalog {
    pub fn builtin() -> Self {
        // the embedded catalog is known to parse
        Self::from_json(BUILTIN_CATALOG).unwrap_or_else(|_| Self::empty())
    }

    pub fn empty() -> Self {
        let mut messages = HashMap::new();
        messages.insert(DEFAULT_LOCALE.to_string(), HashMap::new());
        Self::with_messages(messages, DEFAULT_LOCALE.to_string())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Failed to parse message catalog")?;
        let default_locale = file
            .default_locale
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        if !file.locales.contains_key(&default_locale) {
            bail!(
                "Message catalog does not contain its default locale '{}'",
                default_locale
            );
        }
        Ok(Self::with_messages(file.locales, default_locale))
    }

    fn with_messages(
        messages: HashMap<String, HashMap<String, String>>,
        default_locale: String,
    ) -> Self {
        let (current, _) = watch::channel(default_locale.clone());
        Self {
            messages,
            default_locale,
            current,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Supported language codes, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.messages.keys().cloned().collect();
        locales.sort();
        locales
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.messages.contains_key(lang)
    }

    pub fn language(&self) -> String {
        self.current.borrow().clone()
    }

    /// Switches the current language. Unsupported languages are ignored.
    pub fn change_language(&self, lang: &str) -> bool {
        if !self.supports(lang) {
            debug!("Ignoring unsupported language '{}'", lang);
            return false;
        }
        let previous = self.current.send_replace(lang.to_string());
        if previous != lang {
            debug!("Language changed from '{}' to '{}'", previous, lang);
        }
        true
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }
}

impl Localizer for Catalog {
    fn lookup(&self, key: &str) -> Option<String> {
        let lang = self.current.borrow();
        self.messages
            .get(lang.as_str())
            .and_then(|table| table.get(key))
            .cloned()
    }
}
