use crate::session::{Session, SessionStore, TokenResponse};
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Typed client of the gateway's `/api` surface.
///
/// Credentials come from the attached `SessionStore`: `login` fills it,
/// `logout` clears it, and every other call reads its access token.
pub struct GatewayClient<'s> {
    http: reqwest::Client,
    base_url: String,
    store: &'s SessionStore,
}

impl<'s> GatewayClient<'s> {
    pub fn new(base_url: &str, store: &'s SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Log in and install the resulting session in the store.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Login failed ({}): {}", status, body);
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        let session = Session::from_token_response(tokens, Utc::now());
        self.store.replace(Some(session.clone()));
        info!("Logged in as {}", session.user.email);

        Ok(session)
    }

    /// Drop the current session. Returns whether one was active.
    pub fn logout(&self) -> bool {
        let had_session = self.store.replace(None).is_some();
        if had_session {
            info!("Logged out");
        }
        had_session
    }

    /// `Authorization` header for the current session, if any.
    pub fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.store.access_token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Access token is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// GET a gateway path (e.g. `/api/calls?limit=5`) and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gateway error on {} ({}): {}", path, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }
}
