use crate::proxy::routes::CachePolicy;
use anyhow::{Context, Result};
use reqwest::{header, Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout of the backend health check. Proxied calls use the client default.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(4);

/// Raw backend answer: status and undecoded body text.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Backend reachability as reported by `/healthz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendHealth {
    pub status: String,
    pub ok: bool,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct HealthPayload {
    status: Option<String>,
}

/// Shared HTTP client for all backend calls.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
}

impl BackendClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("ava-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self { http })
    }

    /// Issue one backend request. No retry: any error is final.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&str>,
        body: Option<String>,
        cache: CachePolicy,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        debug!(%method, url, authenticated = bearer.is_some(), "Forwarding to backend");

        let mut request = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(value) = cache.header_value() {
            request = request.header(header::CACHE_CONTROL, value);
        }
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(UpstreamResponse { status, body })
    }

    /// Check `<base_url>/healthz`.
    pub async fn health(&self, base_url: &str) -> BackendHealth {
        let url = format!("{}/healthz", base_url);
        let unavailable = |status: &str| BackendHealth {
            status: status.to_string(),
            ok: false,
            url: base_url.to_string(),
        };

        let response = match self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to contact backend health endpoint: {}", e);
                return unavailable("offline");
            }
        };

        if !response.status().is_success() {
            warn!("Backend health endpoint returned {}", response.status());
            return unavailable("unreachable");
        }

        let status = response
            .json::<HealthPayload>()
            .await
            .ok()
            .and_then(|payload| payload.status)
            .unwrap_or_else(|| "ok".to_string());

        BackendHealth {
            status,
            ok: true,
            url: base_url.to_string(),
        }
    }
}
