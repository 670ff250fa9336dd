use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

use super::Catalog;
use crate::storage::StorageSlot;

/// Languages laid out right-to-left.
pub const RTL_LOCALES: &[&str] = &["ar"];

/// Keeps the catalog's language and the persisted `lang` entry in step.
#[derive(Debug, Clone)]
pub struct LanguageSync {
    catalog: Arc<Catalog>,
    slot: StorageSlot,
}

impl LanguageSync {
    /// Restores the persisted language, or the catalog default when the
    /// stored value is missing, unreadable or unsupported.
    #[tracing::instrument(skip(catalog))]
    pub fn new(catalog: Arc<Catalog>, slot: StorageSlot) -> Self {
        let saved = slot
            .get()
            .filter(|lang| catalog.supports(lang))
            .unwrap_or_else(|| catalog.default_locale().to_string());

        if saved != catalog.language() {
            debug!("Restoring saved language '{}'", saved);
            catalog.change_language(&saved);
        }

        Self { catalog, slot }
    }

    pub fn current_lang(&self) -> String {
        self.catalog.language()
    }

    /// Applies and persists `lang`. Unsupported languages are ignored and
    /// storage failures do not undo the change.
    pub fn change_language(&self, lang: &str) -> bool {
        if !self.catalog.change_language(lang) {
            return false;
        }
        if !self.slot.set(lang) {
            debug!("Could not persist language '{}'", lang);
        }
        info!("Language set to '{}'", lang);
        true
    }

    pub fn supported_languages(&self) -> Vec<String> {
        self.catalog.locales()
    }

    pub fn is_rtl(&self) -> bool {
        RTL_LOCALES.contains(&self.current_lang().as_str())
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.catalog.subscribe()
    }
}
