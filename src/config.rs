//! Runtime configuration
//!
//! The service base URL resolves flag → environment → built-in default.
//! There are no config files; everything is flag/env driven.

/// Production evaluation service.
pub const DEFAULT_BASE_URL: &str =
    "https://fap-justfunctional-evaluator-prod.azurewebsites.net/api/v2/math";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "FXPAD_BASE_URL";

/// Default backend implementation.
pub const DEFAULT_BACKEND: &str = "http";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the two endpoints hang off of.
    pub base_url: String,
    /// Backend implementation name ("http" or "mock").
    pub backend: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            backend: DEFAULT_BACKEND.to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolve config from CLI flags and the process environment.
    pub fn resolve(base_url_flag: Option<String>, backend_flag: Option<String>) -> Self {
        Self::resolve_from(
            base_url_flag,
            std::env::var(BASE_URL_ENV).ok(),
            backend_flag,
        )
    }

    /// Pure resolution: flag wins over env, env over the default.
    fn resolve_from(
        base_url_flag: Option<String>,
        base_url_env: Option<String>,
        backend_flag: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url_flag
                .or(base_url_env)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            backend: backend_flag.unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::resolve_from(None, None, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.backend, "http");
    }

    #[test]
    fn test_env_overrides_default() {
        let config =
            ClientConfig::resolve_from(None, Some("http://localhost:8080/math".to_string()), None);
        assert_eq!(config.base_url, "http://localhost:8080/math");
    }

    #[test]
    fn test_flag_wins_over_env() {
        let config = ClientConfig::resolve_from(
            Some("http://flag/math".to_string()),
            Some("http://env/math".to_string()),
            Some("mock".to_string()),
        );
        assert_eq!(config.base_url, "http://flag/math");
        assert_eq!(config.backend, "mock");
    }
}
