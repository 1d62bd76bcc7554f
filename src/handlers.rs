//! HTTP handlers.
//!
//! API handlers only pick their route descriptor and path parameters; all
//! forwarding behavior lives in `proxy::forward`.

use crate::i18n::{LocaleContext, LocaleRegistry, LocaleStrings, ResolverMetrics};
use crate::proxy::{self, routes, BackendHealth};
use crate::server::AppState;
use axum::{
    extract::{Path, Request, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};

// ==================== Gateway ====================

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "supported_locales": LocaleRegistry::get().list(),
        "locales": ResolverMetrics::global().report(),
    }))
}

pub async fn backend_health(State(state): State<AppState>) -> Json<BackendHealth> {
    Json(state.backend.health(&state.config.api_url).await)
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response()
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"detail": "Method Not Allowed"})),
    )
        .into_response()
}

// ==================== Auth ====================

pub async fn login(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::LOGIN, &[], request).await
}

pub async fn profile(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::PROFILE, &[], request).await
}

// ==================== Calls ====================

pub async fn calls(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::CALLS, &[], request).await
}

pub async fn call_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Response {
    proxy::forward(&state, &routes::CALL_RECORDING, &[("id", &id)], request).await
}

pub async fn call_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Response {
    proxy::forward(&state, &routes::CALL_EMAIL, &[("id", &id)], request).await
}

// ==================== Studio and settings ====================

pub async fn studio_sync(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::STUDIO_SYNC, &[], request).await
}

pub async fn studio_config(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::STUDIO_CONFIG, &[], request).await
}

pub async fn twilio_settings(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::TWILIO_SETTINGS, &[], request).await
}

pub async fn legacy_config(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::LEGACY_CONFIG, &[], request).await
}

pub async fn legacy_config_update(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::LEGACY_CONFIG_UPDATE, &[], request).await
}

pub async fn onboarding(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::ONBOARDING, &[], request).await
}

// ==================== Analytics ====================

pub async fn analytics_overview(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::ANALYTICS_OVERVIEW, &[], request).await
}

pub async fn analytics_timeseries(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::ANALYTICS_TIMESERIES, &[], request).await
}

pub async fn analytics_topics(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::ANALYTICS_TOPICS, &[], request).await
}

pub async fn analytics_heatmap(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::ANALYTICS_HEATMAP, &[], request).await
}

pub async fn analytics_anomalies(State(state): State<AppState>, request: Request) -> Response {
    proxy::forward(&state, &routes::ANALYTICS_ANOMALIES, &[], request).await
}

// ==================== Pages ====================

/// Minimal HTML shell for a localized page.
///
/// The client bundle renders the page itself; the gateway only fixes the
/// document language and direction.
pub async fn page_shell(context: Option<Extension<LocaleContext>>, uri: Uri) -> Response {
    let Some(Extension(context)) = context else {
        return not_found().await;
    };

    Html(render_shell(&context, uri.path())).into_response()
}

fn render_shell(context: &LocaleContext, path: &str) -> String {
    let strings = LocaleStrings::for_locale(context.locale);
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<div id="root" data-path="{path}">
<p>{tagline}</p>
<p>{loading}</p>
</div>
</body>
</html>
"#,
        lang = context.locale.code(),
        dir = context.direction.as_str(),
        title = escape_html(strings.page_title),
        path = escape_html(path),
        tagline = escape_html(strings.tagline),
        loading = escape_html(strings.loading),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
