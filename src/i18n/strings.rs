use crate::i18n::Locale;

/// Localized strings rendered into the page shell.
///
/// The full message catalogs live with the frontend bundle; these are only the
/// few strings the gateway itself puts into HTML.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    /// `<title>` of every page
    pub page_title: &'static str,

    /// Short product description under the title
    pub tagline: &'static str,

    /// Text shown while the client bundle loads
    pub loading: &'static str,
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    page_title: "Ava.ai - Your AI secretary",
    tagline: "Ava answers your calls, books your meetings and sends you a summary.",
    loading: "Loading…",
};

// ==================== French Strings ====================

pub const FRENCH_STRINGS: LocaleStrings = LocaleStrings {
    page_title: "Ava.ai - Votre secrétaire IA",
    tagline: "Ava répond à vos appels, planifie vos rendez-vous et vous envoie un résumé.",
    loading: "Chargement…",
};

// ==================== Hebrew Strings ====================

pub const HEBREW_STRINGS: LocaleStrings = LocaleStrings {
    page_title: "Ava.ai - המזכירה החכמה שלך",
    tagline: "Ava עונה לשיחות שלך, קובעת פגישות ושולחת לך סיכום.",
    loading: "טוען…",
};

impl LocaleStrings {
    /// Strings for a locale. Every registered locale has an entry.
    pub fn for_locale(locale: Locale) -> &'static LocaleStrings {
        match locale.code() {
            "en" => &ENGLISH_STRINGS,
            "he" => &HEBREW_STRINGS,
            _ => &FRENCH_STRINGS,
        }
    }
}
