use crate::proxy::envelope::failure_envelope;
use crate::proxy::routes::ProxyRoute;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Every way a proxied request can end without relaying a backend response.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend response could not be parsed: {0}")]
    Unparsable(String),
}

impl ProxyError {
    /// Client-facing response for this error on the given route.
    ///
    /// Transport and parse failures are logged with their cause; the client
    /// only ever sees the route's generic message.
    pub fn into_route_response(self, route: &ProxyRoute) -> Response {
        match self {
            ProxyError::Unauthorized => {
                warn!(route = route.name, "Rejected request without credentials");
                (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthorized"}))).into_response()
            }
            ProxyError::InvalidBody(reason) => {
                warn!(route = route.name, %reason, "Rejected invalid request body");
                (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid JSON body"}))).into_response()
            }
            ProxyError::BodyTooLarge(limit) => {
                warn!(route = route.name, limit, "Rejected oversized request body");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({"detail": "Request body too large"})),
                )
                    .into_response()
            }
            ProxyError::Transport(e) => {
                error!(route = route.name, error = %e, "Backend unreachable");
                gateway_failure(route)
            }
            ProxyError::Unparsable(reason) => {
                error!(route = route.name, %reason, "Backend returned an unparsable body");
                gateway_failure(route)
            }
        }
    }
}

fn gateway_failure(route: &ProxyRoute) -> Response {
    (
        route.failure_status,
        Json(failure_envelope(route.envelope, route.failure_message)),
    )
        .into_response()
}
