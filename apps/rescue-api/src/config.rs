//! Runtime configuration read from the environment (and `.env` via dotenvy).

use core_lib::adapters::cat_api::DEFAULT_BASE_URL;
use std::net::SocketAddr;

pub const DEFAULT_TOKEN_TTL_MS: i64 = 86_400_000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct CatApiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub fetch_on_startup: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_expiration_ms: i64,
    pub cat_api: CatApiSettings,
    pub data_init_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration_ms = match lookup("JWT_EXPIRATION_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "JWT_EXPIRATION_MS",
                value: raw,
            })?,
            None => DEFAULT_TOKEN_TTL_MS,
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_expiration_ms,
            cat_api: CatApiSettings {
                base_url: lookup("CATAPI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key: lookup("CATAPI_API_KEY").filter(|k| !k.is_empty()),
                fetch_on_startup: parse_flag(&lookup, "CATAPI_FETCH_ON_STARTUP", true)?,
            },
            data_init_enabled: parse_flag(&lookup, "DATA_INIT_ENABLED", true)?,
        })
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "12345678901234567890123456789012")]))
                .unwrap();

        assert_eq!(config.jwt_expiration_ms, DEFAULT_TOKEN_TTL_MS);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.cat_api.base_url, "https://api.thecatapi.com/v1");
        assert!(config.cat_api.api_key.is_none());
        assert!(config.cat_api.fetch_on_startup);
        assert!(config.data_init_enabled);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "12345678901234567890123456789012"),
            ("JWT_EXPIRATION_MS", "-1000"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("CATAPI_BASE_URL", "http://localhost:9999"),
            ("CATAPI_API_KEY", "key"),
            ("CATAPI_FETCH_ON_STARTUP", "false"),
            ("DATA_INIT_ENABLED", "0"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_expiration_ms, -1000);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.cat_api.api_key.as_deref(), Some("key"));
        assert!(!config.cat_api.fetch_on_startup);
        assert!(!config.data_init_enabled);
    }

    #[test]
    fn test_missing_secret() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_values() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "12345678901234567890123456789012"),
            ("DATA_INIT_ENABLED", "maybe"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "DATA_INIT_ENABLED", .. })
        ));

        let result = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "12345678901234567890123456789012"),
            ("JWT_EXPIRATION_MS", "soon"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "JWT_EXPIRATION_MS", .. })
        ));
    }
}
