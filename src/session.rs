//! Client-side session state.
//!
//! A `Session` is built from the gateway's login response and held in a
//! `SessionStore`. The process-wide store must be initialized explicitly with
//! [`SessionStore::init`]; it is only ever mutated through
//! [`SessionStore::replace`] (login installs a session, logout clears it).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Session lifetime used when the login response has no usable `expires_in`.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 15 * 60;

static GLOBAL_STORE: OnceLock<SessionStore> = OnceLock::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session store is already initialized")]
    AlreadyInitialized,

    #[error("session store is not initialized")]
    NotInitialized,
}

/// User profile returned alongside the tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub onboarding_completed: Option<bool>,
    #[serde(default)]
    pub onboarding_step: Option<u32>,
    #[serde(default)]
    pub phone_verified: Option<bool>,
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: SessionUser,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_token_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let ttl = response
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Self {
            user: response.user,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: now + Duration::seconds(ttl),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Holder of the current session.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize the process-wide store. Fails if called twice.
    pub fn init() -> Result<&'static SessionStore, SessionError> {
        GLOBAL_STORE
            .set(SessionStore::new())
            .map_err(|_| SessionError::AlreadyInitialized)?;
        debug!("Session store initialized");
        Self::global()
    }

    /// The process-wide store, once initialized.
    pub fn global() -> Result<&'static SessionStore, SessionError> {
        GLOBAL_STORE.get().ok_or(SessionError::NotInitialized)
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn!("Session store lock poisoned, reading last value");
                poisoned.into_inner().clone()
            }
        }
    }

    /// Access token of the current session, if any.
    pub fn access_token(&self) -> Option<String> {
        self.current().map(|session| session.access_token)
    }

    /// Install a new session (login) or clear it (logout).
    pub fn replace(&self, session: Option<Session>) -> Option<Session> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, session)
    }
}
