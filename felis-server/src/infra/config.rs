use std::{env, time::Duration};

use anyhow::Context;
use felis_core::catalog::{
    CatApiConfig,
    cat_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PASSWORD_PEPPER: &str = "change-me-password-pepper";

/// Server configuration loaded once from environment variables (and an
/// optional `.env` file) at startup.
#[derive(Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Upstream catalog settings
    pub catalog_base_url: String,
    pub catalog_api_key: Option<String>,
    pub catalog_timeout: Duration,

    // Database settings. Absent means accounts live in process memory.
    pub database_url: Option<String>,

    // CORS settings. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,

    // Pepper mixed into every Argon2 password hash
    pub auth_password_pepper: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("catalog_base_url", &self.catalog_base_url)
            .field(
                "catalog_api_key",
                &self.catalog_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("catalog_timeout", &self.catalog_timeout)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            catalog_base_url: DEFAULT_BASE_URL.to_string(),
            catalog_api_key: None,
            catalog_timeout: DEFAULT_TIMEOUT,
            database_url: None,
            cors_allowed_origins: Vec::new(),
            auth_password_pepper: DEFAULT_PASSWORD_PEPPER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server_port = match var("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT is not a valid port: {port}"))?,
            None => DEFAULT_PORT,
        };

        let catalog_timeout = match var("CATALOG_TIMEOUT") {
            Some(timeout) => humantime::parse_duration(timeout.trim())
                .with_context(|| format!("CATALOG_TIMEOUT is not a valid duration: {timeout}"))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            server_port,

            catalog_base_url: var("CATALOG_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            catalog_api_key: var("CATALOG_API_KEY"),
            catalog_timeout,

            database_url: var("DATABASE_URL"),

            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            auth_password_pepper: var("AUTH_PASSWORD_PEPPER")
                .unwrap_or_else(|| DEFAULT_PASSWORD_PEPPER.to_string()),
        })
    }

    pub fn catalog(&self) -> CatApiConfig {
        CatApiConfig {
            base_url: self.catalog_base_url.clone(),
            api_key: self.catalog_api_key.clone(),
            timeout: self.catalog_timeout,
        }
    }

    pub fn uses_default_pepper(&self) -> bool {
        self.auth_password_pepper == DEFAULT_PASSWORD_PEPPER
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.catalog_base_url, "https://api.thecatapi.com/v1");
        assert_eq!(config.catalog_timeout, Duration::from_secs(10));
        assert!(config.catalog_api_key.is_none());
        assert!(config.database_url.is_none());
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.uses_default_pepper());
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "9090"),
            ("CATALOG_BASE_URL", "http://localhost:4000/v1"),
            ("CATALOG_API_KEY", "live_abc"),
            ("CATALOG_TIMEOUT", "2s 500ms"),
            ("DATABASE_URL", "postgres://felis@localhost/felis"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("AUTH_PASSWORD_PEPPER", "pepper"),
        ])
        .unwrap();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.catalog_timeout, Duration::from_millis(2500));
        assert_eq!(config.catalog().api_key.as_deref(), Some("live_abc"));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(!config.uses_default_pepper());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("CATALOG_API_KEY", "  "), ("SERVER_PORT", "")]).unwrap();
        assert!(config.catalog_api_key.is_none());
        assert_eq!(config.server_port, DEFAULT_PORT);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(config_from(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(config_from(&[("CATALOG_TIMEOUT", "soon")]).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = config_from(&[
            ("CATALOG_API_KEY", "live_abc"),
            ("AUTH_PASSWORD_PEPPER", "super-secret-pepper"),
        ])
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("live_abc"));
        assert!(!rendered.contains("super-secret-pepper"));
    }
}
