//! Locale resolution for page routes.
//!
//! Every page path must start with a supported locale segment. Paths that do
//! not are rewritten (not redirected) to the fallback locale before routing,
//! so `/onboarding` is served exactly like `/fr/onboarding`. API routes,
//! framework assets and well-known files bypass resolution.

use crate::i18n::{Locale, ResolverMetrics, TextDirection};
use axum::{
    extract::Request,
    http::{uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

static EXCLUDED_REGEX: OnceLock<Regex> = OnceLock::new();
static LOCALE_SHAPED_REGEX: OnceLock<Regex> = OnceLock::new();

fn excluded_regex() -> &'static Regex {
    EXCLUDED_REGEX.get_or_init(|| {
        Regex::new(
            r"^/(api|_next/static|_next/image|favicon\.ico|manifest\.json|robots\.txt|sitemap\.xml)",
        )
        .expect("valid excluded-path regex")
    })
}

fn locale_shaped_regex() -> &'static Regex {
    LOCALE_SHAPED_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2}(?:[-_][A-Za-z0-9]{1,8})*$").expect("valid locale regex")
    })
}

/// Locale information attached to every resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleContext {
    pub locale: Locale,
    pub direction: TextDirection,
    /// Whether the path was rewritten to the fallback locale
    pub rewritten: bool,
}

impl LocaleContext {
    pub fn new(locale: Locale, rewritten: bool) -> Self {
        Self {
            locale,
            direction: locale.direction(),
            rewritten,
        }
    }
}

/// Outcome of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Excluded path, left untouched and without locale context
    Bypass,
    /// Path already starts with a supported locale
    Accepted(Locale),
    /// Path lacked a supported locale and must be served from `path`
    Rewritten { locale: Locale, path: String },
}

/// Whether a path skips locale resolution entirely.
pub fn is_excluded(path: &str) -> bool {
    excluded_regex().is_match(path)
}

/// Whether a segment looks like a locale tag (`de`, `EN`, `xx-invalid`, `fr_CA`).
///
/// Such segments are treated as a wrong locale and replaced; anything else is
/// a page name and gets the fallback prepended.
pub fn is_locale_shaped(segment: &str) -> bool {
    locale_shaped_regex().is_match(segment)
}

/// Resolve a request path against the locale registry.
pub fn resolve_path(path: &str) -> Resolution {
    if is_excluded(path) {
        return Resolution::Bypass;
    }

    let stripped = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match stripped.find('/') {
        Some(idx) => (&stripped[..idx], &stripped[idx..]),
        None => (stripped, ""),
    };

    if let Ok(locale) = Locale::from_code(first) {
        return Resolution::Accepted(locale);
    }

    let fallback = Locale::fallback();
    let path = if first.is_empty() {
        format!("/{}{}", fallback.code(), rest)
    } else if is_locale_shaped(first) {
        // Any two-letter lead segment counts as a locale, so a page must never
        // be named with two letters (`/ai/pricing` serves `/fr/pricing`).
        format!("/{}{}", fallback.code(), rest)
    } else {
        format!("/{}/{}", fallback.code(), stripped)
    };

    Resolution::Rewritten {
        locale: fallback,
        path,
    }
}

/// Replace the path of a URI, keeping its query string.
fn rewrite_uri(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

/// Middleware that resolves the locale of every request.
///
/// Must wrap the router (not be added with `Router::layer`) so that rewritten
/// URIs are routed.
pub async fn resolve_locale(mut request: Request, next: Next) -> Response {
    let metrics = ResolverMetrics::global();

    match resolve_path(request.uri().path()) {
        Resolution::Bypass => metrics.record_bypassed(),
        Resolution::Accepted(locale) => {
            metrics.record_accepted();
            request
                .extensions_mut()
                .insert(LocaleContext::new(locale, false));
        }
        Resolution::Rewritten { locale, path } => {
            metrics.record_rewritten();
            match rewrite_uri(request.uri(), &path) {
                Ok(uri) => {
                    debug!(from = %request.uri().path(), to = %path, "Rewrote path to fallback locale");
                    *request.uri_mut() = uri;
                }
                Err(e) => warn!(path = %path, error = %e, "Failed to rewrite path, serving as-is"),
            }
            request
                .extensions_mut()
                .insert(LocaleContext::new(locale, true));
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewritten_path(path: &str) -> String {
        match resolve_path(path) {
            Resolution::Rewritten { path, .. } => path,
            other => panic!("expected rewrite for {}, got {:?}", path, other),
        }
    }

    // ==================== Exclusion Tests ====================

    #[test]
    fn test_api_routes_bypass() {
        assert_eq!(resolve_path("/api/calls"), Resolution::Bypass);
        assert_eq!(resolve_path("/api/auth/login"), Resolution::Bypass);
    }

    #[test]
    fn test_static_and_well_known_files_bypass() {
        for path in [
            "/_next/static/chunks/main.js",
            "/_next/image?url=x",
            "/favicon.ico",
            "/manifest.json",
            "/robots.txt",
            "/sitemap.xml",
        ] {
            assert_eq!(resolve_path(path), Resolution::Bypass, "{}", path);
        }
    }

    #[test]
    fn test_other_next_paths_are_not_excluded() {
        assert!(!is_excluded("/_next/data/build.json"));
        assert!(!is_excluded("/dashboard"));
    }

    // ==================== Accepted Tests ====================

    #[test]
    fn test_supported_locales_accepted() {
        assert_eq!(resolve_path("/fr/onboarding"), Resolution::Accepted(Locale::FRENCH));
        assert_eq!(resolve_path("/en"), Resolution::Accepted(Locale::ENGLISH));
        assert_eq!(resolve_path("/he/dashboard/calls"), Resolution::Accepted(Locale::HEBREW));
    }

    // ==================== Rewrite Tests ====================

    #[test]
    fn test_invalid_locale_segment_replaced() {
        assert_eq!(rewritten_path("/xx-invalid/onboarding"), "/fr/onboarding");
    }

    #[test]
    fn test_uppercase_locale_is_not_accepted() {
        assert_eq!(rewritten_path("/EN/pricing"), "/fr/pricing");
    }

    #[test]
    fn test_unsupported_locale_replaced() {
        assert_eq!(rewritten_path("/de"), "/fr");
        assert_eq!(rewritten_path("/fr_CA/auth"), "/fr/auth");
    }

    #[test]
    fn test_two_letter_page_segment_is_taken_for_a_locale() {
        assert_eq!(rewritten_path("/ai/pricing"), "/fr/pricing");
        assert_eq!(rewritten_path("/faq/pricing"), "/fr/faq/pricing");
    }

    #[test]
    fn test_trailing_slash_after_locale() {
        assert_eq!(resolve_path("/fr/"), Resolution::Accepted(Locale::FRENCH));
        assert_eq!(rewritten_path("/xx-invalid/"), "/fr/");
        assert_eq!(rewritten_path("/de/"), "/fr/");
    }

    #[test]
    fn test_page_without_locale_prefixed() {
        assert_eq!(rewritten_path("/onboarding"), "/fr/onboarding");
        assert_eq!(rewritten_path("/dashboard/calls"), "/fr/dashboard/calls");
    }

    #[test]
    fn test_root_prefixed() {
        assert_eq!(rewritten_path("/"), "/fr");
        assert_eq!(rewritten_path(""), "/fr");
    }

    #[test]
    fn test_trailing_slash_preserved() {
        assert_eq!(rewritten_path("/pricing/"), "/fr/pricing/");
    }

    #[test]
    fn test_rewrite_carries_fallback_locale() {
        match resolve_path("/pricing") {
            Resolution::Rewritten { locale, .. } => assert_eq!(locale, Locale::fallback()),
            other => panic!("unexpected {:?}", other),
        }
    }

    // ==================== Locale Shape Tests ====================

    #[test]
    fn test_locale_shaped_segments() {
        assert!(is_locale_shaped("de"));
        assert!(is_locale_shaped("EN"));
        assert!(is_locale_shaped("xx-invalid"));
        assert!(is_locale_shaped("pt_BR"));
        assert!(!is_locale_shaped("onboarding"));
        assert!(!is_locale_shaped("faq"));
        assert!(!is_locale_shaped("x"));
        assert!(!is_locale_shaped("12"));
    }

    // ==================== URI Rewrite Tests ====================

    #[test]
    fn test_rewrite_uri_keeps_query() {
        let uri: Uri = "/onboarding?step=2&plan=pro".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/fr/onboarding").expect("rewrite");
        assert_eq!(rewritten.path(), "/fr/onboarding");
        assert_eq!(rewritten.query(), Some("step=2&plan=pro"));
    }

    #[test]
    fn test_rewrite_uri_without_query() {
        let uri: Uri = "/pricing".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/fr/pricing").expect("rewrite");
        assert_eq!(rewritten.to_string(), "/fr/pricing");
    }

    #[test]
    fn test_locale_context_direction() {
        let context = LocaleContext::new(Locale::HEBREW, false);
        assert_eq!(context.direction, TextDirection::Rtl);
        assert!(!context.rewritten);
    }
}
