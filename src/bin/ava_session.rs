//! Session check binary - logs in through the gateway and lists recent calls
//!
//! Usage:
//!   cargo run --bin ava-session                # Log in and print calls
//!   cargo run --bin ava-session -- --profile   # Also print the user profile
//!
//! Required environment variables:
//! - AVA_EMAIL
//! - AVA_PASSWORD
//!
//! Optional:
//! - GATEWAY_URL (defaults to http://localhost:3000)
//! - CALLS_LIMIT (defaults to 10)

use anyhow::{Context, Result};
use ava_gateway::client::GatewayClient;
use ava_gateway::session::SessionStore;
use tracing::info;

/// Minimal config for the session check (no backend URL required)
struct SessionConfig {
    gateway_url: String,
    email: String,
    password: String,
    calls_limit: u32,
}

impl SessionConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            gateway_url: std::env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            email: std::env::var("AVA_EMAIL").context("AVA_EMAIL not set")?,
            password: std::env::var("AVA_PASSWORD").context("AVA_PASSWORD not set")?,
            calls_limit: std::env::var("CALLS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ava_gateway=info".parse()?),
        )
        .init();

    let show_profile = std::env::args().any(|arg| arg == "--profile");
    let config = SessionConfig::from_env()?;

    let store = SessionStore::init().context("Failed to initialize session store")?;
    let client = GatewayClient::new(&config.gateway_url, store);

    info!("Logging in to {}", config.gateway_url);
    let session = client.login(&config.email, &config.password).await?;
    info!("Session valid until {}", session.expires_at.to_rfc3339());

    if show_profile {
        let profile = client.get_json("/api/auth/me").await?;
        println!("{}", serde_json::to_string_pretty(&profile)?);
    }

    let calls = client
        .get_json(&format!("/api/calls?limit={}", config.calls_limit))
        .await?;
    println!("{}", serde_json::to_string_pretty(&calls)?);

    client.logout();
    Ok(())
}
