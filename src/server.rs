use crate::config::Config;
use crate::handlers;
use crate::i18n::resolve_locale;
use crate::proxy::BackendClient;
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state of every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            backend: BackendClient::new()?,
        })
    }
}

/// Route table without locale resolution.
///
/// Unmatched paths answer 404 and unsupported methods 405, both as JSON.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Gateway
        .route("/api/health", get(handlers::health))
        .route("/api/backend/health", get(handlers::backend_health))
        // Auth
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/me", get(handlers::profile).patch(handlers::profile))
        // Calls
        .route("/api/calls", get(handlers::calls))
        .route("/api/calls/:id/recording", get(handlers::call_recording))
        .route("/api/calls/:id/email", post(handlers::call_email))
        // Studio and settings
        .route("/api/studio/sync-vapi", post(handlers::studio_sync))
        .route(
            "/api/studio/config",
            get(handlers::studio_config).patch(handlers::studio_config),
        )
        .route(
            "/api/twilio-settings",
            get(handlers::twilio_settings)
                .post(handlers::twilio_settings)
                .delete(handlers::twilio_settings),
        )
        .route(
            "/api/config",
            get(handlers::legacy_config).post(handlers::legacy_config_update),
        )
        .route("/api/user/onboarding", patch(handlers::onboarding))
        // Analytics
        .route("/api/analytics/overview", get(handlers::analytics_overview))
        .route("/api/analytics/timeseries", get(handlers::analytics_timeseries))
        .route("/api/analytics/topics", get(handlers::analytics_topics))
        .route("/api/analytics/heatmap", get(handlers::analytics_heatmap))
        .route("/api/analytics/anomalies", get(handlers::analytics_anomalies))
        // Pages
        .route("/:locale", get(handlers::page_shell))
        .route("/:locale/", get(handlers::page_shell))
        .route("/:locale/*rest", get(handlers::page_shell))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
}

/// Full application: locale resolution wraps the route table so that
/// rewritten URIs are routed, then every request is traced.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .fallback_service(build_router(state))
        .layer(middleware::from_fn(resolve_locale))
        .layer(TraceLayer::new_for_http())
}
