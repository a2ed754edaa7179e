//! Supported language registry.
//!
//! The pipeline accepts a fixed set of ISO 639-1 codes shared by all three
//! providers. Codes are normalized (lowercased, full names mapped to codes)
//! before validation.

/// Supported languages as (code, native name) pairs.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("es", "Español"),
    ("en", "English"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("pt", "Português"),
    ("ru", "Русский"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh-cn", "简体中文"),
    ("ar", "العربية"),
    ("hi", "हिन्दी"),
];

/// Check whether a language code is in the supported set.
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
}

/// Native name for a supported language code.
pub fn name_for(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Normalize a language identifier to a lowercase ISO code.
///
/// Accepts codes in any case and the native full names the web form used to
/// submit ("Español" → "es").
pub fn normalize(language: &str) -> String {
    let lowered = language.trim().to_lowercase();
    for (code, name) in SUPPORTED_LANGUAGES {
        if name.to_lowercase() == lowered {
            return (*code).to_string();
        }
    }
    lowered
}

/// Supported languages sorted by display name, for UI listings.
pub fn sorted_by_name() -> Vec<(&'static str, &'static str)> {
    let mut languages: Vec<_> = SUPPORTED_LANGUAGES.to_vec();
    languages.sort_by_key(|(_, name)| *name);
    languages
}
