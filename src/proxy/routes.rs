//! Route descriptors: one `ProxyRoute` per backend resource.
//!
//! The descriptors are the only per-resource code. Credential handling, body
//! preparation, response translation and failure envelopes all live in the
//! shared `forward` path and are selected by these fields.

use axum::http::{Method, StatusCode};

/// Method used for the backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    /// Same method as the inbound request
    Inbound,
    /// Always PATCH, whatever the client sent
    Patch,
}

impl ForwardMethod {
    pub fn resolve(&self, inbound: &Method) -> Method {
        match self {
            ForwardMethod::Inbound => inbound.clone(),
            ForwardMethod::Patch => Method::PATCH,
        }
    }
}

/// How a route treats missing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Never forward credentials (the route creates them)
    Omit,
    /// Forward when present, call the backend anonymously otherwise
    Optional,
    /// Reject with 401 before contacting the backend when absent
    Required,
}

/// How the inbound body is turned into the forwarded body.
///
/// Only applies to methods that carry a body (not GET, HEAD, DELETE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Must be valid JSON, else 400
    Json,
    /// Forwarded as raw text; blank becomes `{}`
    Passthrough,
    /// JSON object reduced to the listed fields
    Select(&'static [&'static str]),
}

/// Client-facing shape of a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// Backend body relayed as-is; failures use `{"detail": ...}`
    Passthrough,
    /// `{"success": true, ...body}`; failures use `{"success": false, "error": ...}`
    Merge,
    /// `{"success": true, key: body[key]}`; failures as `Merge`
    Keyed(&'static str),
    /// `{"success": true, key: body}`; failures as `Merge`
    Wrapped(&'static str),
}

/// Caching directive applied to both the forwarded request and the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Always hit the backend fresh and forbid client caching
    NoStore,
    /// Leave caching headers untouched
    Default,
}

impl CachePolicy {
    /// `Cache-Control` value to send, if any.
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            CachePolicy::NoStore => Some("no-store"),
            CachePolicy::Default => None,
        }
    }
}

/// Everything the shared proxy path needs to know about one resource.
#[derive(Debug, Clone, Copy)]
pub struct ProxyRoute {
    /// Short name used in logs
    pub name: &'static str,
    /// Backend path; `{param}` placeholders are filled from path parameters
    pub backend_path: &'static str,
    /// Backend method, usually the inbound one
    pub method: ForwardMethod,
    pub credentials: CredentialPolicy,
    pub body: BodyMode,
    pub envelope: EnvelopeShape,
    pub cache: CachePolicy,
    /// Whether a successful response sets the session cookies
    pub issues_credentials: bool,
    /// Status returned when the backend cannot be reached
    pub failure_status: StatusCode,
    /// Generic message returned when the backend cannot be reached
    pub failure_message: &'static str,
}

impl ProxyRoute {
    /// Backend path with placeholders substituted (percent-encoded).
    ///
    /// Unknown placeholders are left in place.
    pub fn backend_path(&self, params: &[(&str, &str)]) -> String {
        let mut path = self.backend_path.to_string();
        for (key, value) in params {
            path = path.replace(&format!("{{{}}}", key), &urlencoding::encode(value));
        }
        path
    }

    /// Full backend URL: base, resource path, and the inbound query verbatim.
    pub fn backend_url(&self, base_url: &str, params: &[(&str, &str)], query: Option<&str>) -> String {
        let path = self.backend_path(params);
        match query.filter(|q| !q.is_empty()) {
            Some(q) => format!("{}{}?{}", base_url, path, q),
            None => format!("{}{}", base_url, path),
        }
    }
}

// ==================== Auth ====================

pub const LOGIN: ProxyRoute = ProxyRoute {
    name: "auth.login",
    backend_path: "/api/v1/auth/login",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Omit,
    body: BodyMode::Json,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: true,
    failure_status: StatusCode::SERVICE_UNAVAILABLE,
    failure_message: "Login service unavailable",
};

pub const PROFILE: ProxyRoute = ProxyRoute {
    name: "auth.me",
    backend_path: "/api/v1/auth/me",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Required,
    body: BodyMode::Json,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Profile service unavailable",
};

// ==================== Calls ====================

pub const CALLS: ProxyRoute = ProxyRoute {
    name: "calls.list",
    backend_path: "/api/v1/calls",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Optional,
    body: BodyMode::Passthrough,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Calls service unavailable",
};

pub const CALL_RECORDING: ProxyRoute = ProxyRoute {
    name: "calls.recording",
    backend_path: "/api/v1/calls/{id}/recording",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Optional,
    body: BodyMode::Passthrough,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Recording service unavailable",
};

pub const CALL_EMAIL: ProxyRoute = ProxyRoute {
    name: "calls.email",
    backend_path: "/api/v1/analytics/calls/{id}/email",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Optional,
    body: BodyMode::Passthrough,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Failed to send email",
};

// ==================== Studio ====================

pub const STUDIO_SYNC: ProxyRoute = ProxyRoute {
    name: "studio.sync_vapi",
    backend_path: "/api/v1/studio/sync-vapi",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Required,
    body: BodyMode::Passthrough,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Failed to reach studio sync service",
};

pub const STUDIO_CONFIG: ProxyRoute = ProxyRoute {
    name: "studio.config",
    backend_path: "/api/v1/studio/config",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Required,
    body: BodyMode::Json,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Studio configuration service unavailable",
};

/// Legacy settings form endpoint: reads and saves the same studio config.
pub const LEGACY_CONFIG: ProxyRoute = ProxyRoute {
    name: "config.read",
    backend_path: "/api/v1/studio/config",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Optional,
    body: BodyMode::Json,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Failed to read configuration",
};

/// Saving through the legacy endpoint is a POST answered as `{success, config}`.
pub const LEGACY_CONFIG_UPDATE: ProxyRoute = ProxyRoute {
    name: "config.update",
    backend_path: "/api/v1/studio/config",
    method: ForwardMethod::Patch,
    credentials: CredentialPolicy::Optional,
    body: BodyMode::Json,
    envelope: EnvelopeShape::Wrapped("config"),
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Failed to save configuration",
};

// ==================== Settings ====================

pub const TWILIO_SETTINGS: ProxyRoute = ProxyRoute {
    name: "twilio_settings",
    backend_path: "/api/v1/twilio-settings",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Required,
    body: BodyMode::Passthrough,
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Twilio settings service unavailable",
};

pub const ONBOARDING_FIELDS: &[&str] = &[
    "onboarding_vapi_skipped",
    "onboarding_twilio_skipped",
    "onboarding_assistant_created",
];

pub const ONBOARDING: ProxyRoute = ProxyRoute {
    name: "user.onboarding",
    backend_path: "/api/v1/user/onboarding",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Required,
    body: BodyMode::Select(ONBOARDING_FIELDS),
    envelope: EnvelopeShape::Passthrough,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Onboarding service unavailable",
};

// ==================== Analytics ====================

pub const ANALYTICS_OVERVIEW: ProxyRoute = ProxyRoute {
    name: "analytics.overview",
    backend_path: "/api/v1/analytics/overview",
    method: ForwardMethod::Inbound,
    credentials: CredentialPolicy::Optional,
    body: BodyMode::Passthrough,
    envelope: EnvelopeShape::Merge,
    cache: CachePolicy::NoStore,
    issues_credentials: false,
    failure_status: StatusCode::BAD_GATEWAY,
    failure_message: "Failed to fetch analytics overview",
};

pub const ANALYTICS_TIMESERIES: ProxyRoute = analytics(
    "analytics.timeseries",
    "/api/v1/analytics/timeseries",
    "series",
    "Failed to fetch analytics timeseries",
);

pub const ANALYTICS_TOPICS: ProxyRoute = analytics(
    "analytics.topics",
    "/api/v1/analytics/topics",
    "topics",
    "Failed to fetch analytics topics",
);

pub const ANALYTICS_HEATMAP: ProxyRoute = analytics(
    "analytics.heatmap",
    "/api/v1/analytics/heatmap",
    "heatmap",
    "Failed to fetch analytics heatmap",
);

pub const ANALYTICS_ANOMALIES: ProxyRoute = analytics(
    "analytics.anomalies",
    "/api/v1/analytics/anomalies",
    "anomalies",
    "Failed to fetch analytics anomalies",
);

/// Keyed analytics variant: the backend list is returned under `key`.
const fn analytics(
    name: &'static str,
    backend_path: &'static str,
    key: &'static str,
    failure_message: &'static str,
) -> ProxyRoute {
    ProxyRoute {
        name,
        backend_path,
        method: ForwardMethod::Inbound,
        credentials: CredentialPolicy::Optional,
        body: BodyMode::Passthrough,
        envelope: EnvelopeShape::Keyed(key),
        cache: CachePolicy::NoStore,
        issues_credentials: false,
        failure_status: StatusCode::BAD_GATEWAY,
        failure_message,
    }
}
