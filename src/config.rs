use anyhow::{Context, Result};

/// Local backend used when no URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    /// Base URL of the backend API, without trailing slash
    pub api_url: String,

    // Server
    pub port: u16,

    // Deployment
    /// Production deployments mark session cookies `Secure`
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("API_URL")
            .or_else(|_| std::env::var("APP_BACKEND_URL"))
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", v))?,
            Err(_) => 3000,
        };

        Ok(Self {
            api_url: normalize_base_url(&api_url),
            port,
            production: std::env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        })
    }

    /// Config pointing at an explicit backend, for tests and tools.
    pub fn for_backend(api_url: &str) -> Self {
        Self {
            api_url: normalize_base_url(api_url),
            port: 3000,
            production: false,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["API_URL", "APP_BACKEND_URL", "PORT", "APP_ENV"] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("defaults should load");

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.port, 3000);
        assert!(!config.production);
    }

    #[test]
    #[serial]
    fn test_api_url_precedence() {
        clear_env();
        std::env::set_var("APP_BACKEND_URL", "http://secondary:9000");
        assert_eq!(Config::from_env().unwrap().api_url, "http://secondary:9000");

        std::env::set_var("API_URL", "https://api.ava.ai/");
        assert_eq!(Config::from_env().unwrap().api_url, "https://api.ava.ai");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_api_url_falls_back_to_default() {
        clear_env();
        std::env::set_var("API_URL", "  ");
        assert_eq!(Config::from_env().unwrap().api_url, DEFAULT_API_URL);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_an_error() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("PORT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_flag() {
        clear_env();
        std::env::set_var("APP_ENV", "Production");
        assert!(Config::from_env().unwrap().production);

        std::env::set_var("APP_ENV", "staging");
        assert!(!Config::from_env().unwrap().production);
        clear_env();
    }

    #[test]
    fn test_for_backend_trims_trailing_slash() {
        let config = Config::for_backend("http://127.0.0.1:4000/");
        assert_eq!(config.api_url, "http://127.0.0.1:4000");
    }
}
