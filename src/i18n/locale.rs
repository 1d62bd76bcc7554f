//! Locale type: a validated, copyable handle into the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry, TextDirection};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};

/// A validated locale.
///
/// Only codes that exist in the registry can be turned into a
/// `Locale`, so downstream code never has to re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const FRENCH: Locale = Locale { code: "fr" };
    pub const HEBREW: Locale = Locale { code: "he" };

    /// Create a Locale from a URL segment.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered
    /// * `Err` otherwise (unknown, wrong case, empty)
    pub fn from_code(code: &str) -> Result<Locale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) => Ok(Locale { code: config.code }),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// The locale substituted for missing or invalid segments.
    pub fn fallback() -> Locale {
        Locale {
            code: LocaleRegistry::get().fallback().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full configuration from the registry.
    ///
    /// # Panics
    /// Never in practice: a `Locale` can only be built from registered codes.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    pub fn direction(&self) -> TextDirection {
        self.config().direction
    }

    pub fn is_fallback(&self) -> bool {
        self.config().is_fallback
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
