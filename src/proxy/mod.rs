//! Authenticated proxy layer.
//!
//! Every `/api/*` handler is a thin call into [`forward`] with a
//! [`ProxyRoute`] descriptor. A call ends in exactly one of three ways: the
//! backend's 2xx answer relayed (possibly enveloped), the backend's non-2xx
//! answer relayed verbatim, or a fixed gateway failure envelope. There is no
//! retry and no state kept between calls.

pub mod backend;
pub mod credentials;
pub mod envelope;
mod error;
pub mod routes;

pub use backend::{BackendClient, BackendHealth, UpstreamResponse};
pub use error::ProxyError;
pub use routes::{
    BodyMode, CachePolicy, CredentialPolicy, EnvelopeShape, ForwardMethod, ProxyRoute,
};

use crate::server::AppState;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, info};

/// Largest inbound body accepted for forwarding.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Forward an inbound request to the backend resource described by `route`.
///
/// `params` fills the `{placeholders}` of the route's backend path.
pub async fn forward(
    state: &AppState,
    route: &ProxyRoute,
    params: &[(&str, &str)],
    request: Request,
) -> Response {
    let mut response = match try_forward(state, route, params, request).await {
        Ok(response) => response,
        Err(e) => e.into_route_response(route),
    };

    if let Some(value) = route.cache.header_value() {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(value));
    }
    response
}

async fn try_forward(
    state: &AppState,
    route: &ProxyRoute,
    params: &[(&str, &str)],
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let token = match route.credentials {
        CredentialPolicy::Omit => None,
        CredentialPolicy::Optional => credentials::extract_token(&parts.headers),
        CredentialPolicy::Required => {
            Some(credentials::extract_token(&parts.headers).ok_or(ProxyError::Unauthorized)?)
        }
    };

    let body = if carries_body(&parts.method) {
        let bytes = read_body(body).await?;
        let raw = String::from_utf8_lossy(&bytes);
        Some(envelope::prepare_body(route.body, &raw)?)
    } else {
        None
    };

    let url = route.backend_url(&state.config.api_url, params, parts.uri.query());
    let upstream = state
        .backend
        .send(
            route.method.resolve(&parts.method),
            &url,
            token.as_deref(),
            body,
            route.cache,
        )
        .await?;

    debug!(route = route.name, status = %upstream.status, "Backend responded");

    if upstream.status == StatusCode::NO_CONTENT {
        return Ok((StatusCode::NO_CONTENT, Body::empty()).into_response());
    }

    let payload = envelope::translate(route.envelope, upstream.status, &upstream.body)?;

    let cookies = if route.issues_credentials && upstream.status.is_success() {
        credentials::login_cookies(&payload, state.config.production, Utc::now())
    } else {
        Vec::new()
    };

    let mut response = (upstream.status, Json(payload)).into_response();
    if !cookies.is_empty() {
        info!(route = route.name, "Issued session cookies");
    }
    for cookie in cookies {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

/// Buffer an inbound body, up to `MAX_BODY_BYTES`.
async fn read_body(body: Body) -> Result<Bytes, ProxyError> {
    let collected = Limited::new(body, MAX_BODY_BYTES).collect().await.map_err(|e| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            ProxyError::BodyTooLarge(MAX_BODY_BYTES)
        } else {
            ProxyError::InvalidBody(e.to_string())
        }
    })?;
    Ok(collected.to_bytes())
}

/// Whether a forwarded request of this method carries a body.
fn carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::DELETE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let bytes = read_body(Body::from("{}")).await.unwrap();
        assert_eq!(&bytes[..], b"{}");
    }

    #[tokio::test]
    async fn test_read_body_over_limit() {
        let oversized = vec![b'a'; MAX_BODY_BYTES + 1];
        let result = read_body(Body::from(oversized)).await;
        assert!(matches!(result, Err(ProxyError::BodyTooLarge(MAX_BODY_BYTES))));
    }

    #[test]
    fn test_carries_body() {
        assert!(carries_body(&Method::POST));
        assert!(carries_body(&Method::PATCH));
        assert!(carries_body(&Method::PUT));
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::HEAD));
        assert!(!carries_body(&Method::DELETE));
    }
}
