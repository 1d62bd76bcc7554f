//! Bearer credential extraction and session cookie issuance.

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::warn;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Access token cookie lifetime: 7 days
pub const ACCESS_TOKEN_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Refresh token cookie lifetime: 30 days
pub const REFRESH_TOKEN_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

const BEARER_PREFIX: &str = "Bearer ";

/// Token from an `Authorization: Bearer <token>` header.
///
/// Any other scheme, or an empty token, counts as absent.
pub fn bearer_from_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
}

/// Value of a named cookie across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// The caller's access token: the header wins over the cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    bearer_from_header(headers)
        .or_else(|| cookie_value(headers, ACCESS_TOKEN_COOKIE))
        .map(str::to_string)
}

/// Build a `Set-Cookie` value for a session token.
///
/// Always `Path=/; HttpOnly; SameSite=Lax`; `Secure` only for production.
pub fn session_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    secure: bool,
    now: DateTime<Utc>,
) -> String {
    let expires = now + Duration::seconds(max_age_secs);
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; Expires={}; HttpOnly; SameSite=Lax",
        name,
        value,
        max_age_secs,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` headers for the tokens in a successful login body.
///
/// A token that is missing, not a string, or not a valid header value is
/// skipped with a warning rather than failing the login.
pub fn login_cookies(body: &Value, secure: bool, now: DateTime<Utc>) -> Vec<HeaderValue> {
    [
        (ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_MAX_AGE_SECS),
        (REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_MAX_AGE_SECS),
    ]
    .into_iter()
    .filter_map(|(name, max_age)| {
        let Some(token) = body.get(name).and_then(Value::as_str) else {
            warn!("Login response has no {}, cookie not set", name);
            return None;
        };
        match HeaderValue::from_str(&session_cookie(name, token, max_age, secure, now)) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Login response {} is not cookie-safe: {}", name, e);
                None
            }
        }
    })
    .collect()
}
