//! Internationalization (i18n) module: supported locales and URL resolution.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales and their metadata
//! - `locale`: Type-safe `Locale` handle validated against the registry
//! - `resolver`: Path resolution and the middleware that rewrites unlocalized paths
//! - `strings`: The few localized strings the gateway renders itself
//! - `metrics`: Resolution counters
//!
//! # Example
//!
//! ```rust,ignore
//! use ava_gateway::i18n::{resolve_path, Locale, Resolution};
//!
//! assert_eq!(resolve_path("/he/dashboard"), Resolution::Accepted(Locale::HEBREW));
//! ```

mod locale;
mod metrics;
mod registry;
mod resolver;
mod strings;

pub use locale::Locale;
pub use metrics::{MetricsReport, ResolverMetrics};
pub use registry::{LocaleConfig, LocaleRegistry, TextDirection};
pub use resolver::{
    is_excluded, is_locale_shaped, resolve_locale, resolve_path, LocaleContext, Resolution,
};
pub use strings::LocaleStrings;
