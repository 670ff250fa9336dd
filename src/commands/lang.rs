use anyhow::{Result, bail};

use crate::i18n::LanguageSync;

#[tracing::instrument(skip(language))]
pub fn show(language: &LanguageSync) -> Result<()> {
    println!("{}", describe(language));
    Ok(())
}

#[tracing::instrument(skip(language))]
pub fn set(language: &LanguageSync, lang: &str) -> Result<()> {
    if !language.change_language(lang) {
        bail!(
            "Unsupported language '{}'. Supported: {}",
            lang,
            language.supported_languages().join(", ")
        );
    }
    println!("{}", describe(language));
    Ok(())
}

pub fn describe(language: &LanguageSync) -> String {
    let lang = language.current_lang();
    if language.is_rtl() {
        format!("{} (right-to-left)", lang)
    } else {
        lang
    }
}
