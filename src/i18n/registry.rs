//! Locale registry: Single source of truth for all supported locales.
//!
//! The registry is a process-wide singleton behind `OnceLock`, initialized on
//! first access and immutable afterwards. Every locale-aware path decision in
//! the resolver goes through it.

use serde::Serialize;
use std::sync::OnceLock;

/// Text direction of a locale, rendered into the `dir` attribute of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// HTML attribute value (`"ltr"` or `"rtl"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Configuration for a supported locale.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleConfig {
    /// URL segment code (e.g., "en", "fr", "he")
    pub code: &'static str,

    /// English name of the locale (e.g., "French")
    pub name: &'static str,

    /// Native name of the locale (e.g., "Français")
    pub native_name: &'static str,

    /// Text direction used when rendering pages in this locale
    pub direction: TextDirection,

    /// Whether this locale is substituted for missing or invalid ones (exactly one)
    pub is_fallback: bool,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// Matching is case-sensitive: `"FR"` is not `"fr"`.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All supported locales, in registry order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// Get the fallback locale configuration.
    ///
    /// # Panics
    /// Panics if zero or several locales are flagged as fallback. The table is
    /// static, so this is a programming error caught by the tests below.
    pub fn fallback(&self) -> &LocaleConfig {
        let fallbacks: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_fallback)
            .collect();

        match fallbacks.len() {
            0 => panic!("No fallback locale found in registry"),
            1 => fallbacks[0],
            _ => panic!("Multiple fallback locales found in registry"),
        }
    }
}

/// Default locale configurations: English, French (fallback) and Hebrew.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            direction: TextDirection::Ltr,
            is_fallback: false,
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            direction: TextDirection::Ltr,
            is_fallback: true,
        },
        LocaleConfig {
            code: "he",
            name: "Hebrew",
            native_name: "עברית",
            direction: TextDirection::Rtl,
            is_fallback: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_french() {
        let config = LocaleRegistry::get()
            .get_by_code("fr")
            .expect("fr should be registered");

        assert_eq!(config.name, "French");
        assert_eq!(config.native_name, "Français");
        assert_eq!(config.direction, TextDirection::Ltr);
        assert!(config.is_fallback);
    }

    #[test]
    fn test_get_by_code_hebrew_is_rtl() {
        let config = LocaleRegistry::get()
            .get_by_code("he")
            .expect("he should be registered");

        assert_eq!(config.direction, TextDirection::Rtl);
        assert!(!config.is_fallback);
    }

    #[test]
    fn test_get_by_code_is_case_sensitive() {
        let registry = LocaleRegistry::get();
        assert!(registry.get_by_code("FR").is_none());
        assert!(registry.get_by_code("En").is_none());
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("de").is_none());
        assert!(LocaleRegistry::get().get_by_code("").is_none());
    }

    #[test]
    fn test_list_contains_all_three() {
        let locales = LocaleRegistry::get().list();

        assert_eq!(locales.len(), 3);
        for code in ["en", "fr", "he"] {
            assert!(locales.iter().any(|locale| locale.code == code));
        }
    }

    #[test]
    fn test_exactly_one_fallback() {
        let registry = LocaleRegistry::get();
        let count = registry
            .list()
            .iter()
            .filter(|locale| locale.is_fallback)
            .count();

        assert_eq!(count, 1);
        assert_eq!(registry.fallback().code, "fr");
    }

    #[test]
    fn test_locale_config_serialization() {
        let config = LocaleRegistry::get().get_by_code("he").unwrap();
        let json = serde_json::to_value(config).unwrap();

        assert_eq!(json["code"], "he");
        assert_eq!(json["native_name"], "עברית");
        assert_eq!(json["direction"], "rtl");
        assert_eq!(json["is_fallback"], false);
    }

    #[test]
    fn test_text_direction_serialization() {
        assert_eq!(serde_json::to_string(&TextDirection::Rtl).unwrap(), "\"rtl\"");
        assert_eq!(TextDirection::Ltr.as_str(), "ltr");
    }
}
