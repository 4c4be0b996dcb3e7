//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// Ten years; keeps `issued_at + ttl` far from chrono's range limits.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub pokeapi_base_url: String,
    pub catalog_fetch_limit: u32,
    pub upstream_timeout_secs: u64,
    /// Zero disables the index cache.
    pub catalog_cache_ttl_secs: u64,
    pub jwt_secret: String,
    pub session_ttl_days: i64,
    pub auth_username: String,
    pub auth_password: String,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let bind_address: SocketAddr = parse_var("BIND_ADDRESS", &var_or("BIND_ADDRESS", "0.0.0.0:3000"))?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;
        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");

        // --- Load Upstream Catalog Settings ---
        let pokeapi_base_url = var_or("POKEAPI_BASE_URL", "https://pokeapi.co/api/v2")
            .trim_end_matches('/')
            .to_string();
        let catalog_fetch_limit: u32 =
            parse_positive("CATALOG_FETCH_LIMIT", &var_or("CATALOG_FETCH_LIMIT", "1500"))?;
        let upstream_timeout_secs: u64 =
            parse_positive("UPSTREAM_TIMEOUT_SECS", &var_or("UPSTREAM_TIMEOUT_SECS", "10"))?;
        let catalog_cache_ttl_secs: u64 =
            parse_var("CATALOG_CACHE_TTL_SECS", &var_or("CATALOG_CACHE_TTL_SECS", "0"))?;

        // --- Load Auth Settings ---
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        let session_ttl_days: i64 =
            parse_positive("SESSION_TTL_DAYS", &var_or("SESSION_TTL_DAYS", "7"))?;
        if session_ttl_days > MAX_SESSION_TTL_DAYS {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_DAYS".to_string(),
                format!("must be at most {}", MAX_SESSION_TTL_DAYS),
            ));
        }
        let auth_username = var_or("AUTH_USERNAME", "admin");
        let auth_password = var_or("AUTH_PASSWORD", "admin");

        Ok(Self {
            bind_address,
            log_level,
            pokeapi_base_url,
            catalog_fetch_limit,
            upstream_timeout_secs,
            catalog_cache_ttl_secs,
            jwt_secret,
            session_ttl_days,
            auth_username,
            auth_password,
            cors_origin,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value: T = parse_var(key, raw)?;
    if value <= T::default() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.pokeapi_base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.catalog_fetch_limit, 1500);
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.catalog_cache_ttl_secs, 0);
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.auth_username, "admin");
        assert_eq!(config.auth_password, "admin");
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref v) if v == "JWT_SECRET"));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "UPSTREAM_TIMEOUT_SECS"));

        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret"), ("RUST_LOG", "loud")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "RUST_LOG"));
    }

    #[test]
    fn session_ttl_is_bounded() {
        let at_cap = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("SESSION_TTL_DAYS", "3650"),
        ]))
        .unwrap();
        assert_eq!(at_cap.session_ttl_days, MAX_SESSION_TTL_DAYS);

        for raw in ["3651", "9223372036854775807"] {
            let err = Config::from_lookup(lookup(&[
                ("JWT_SECRET", "s3cret"),
                ("SESSION_TTL_DAYS", raw),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue(ref v, _) if v == "SESSION_TTL_DAYS"),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("POKEAPI_BASE_URL", "http://localhost:8080/api/v2/"),
        ]))
        .unwrap();
        assert_eq!(config.pokeapi_base_url, "http://localhost:8080/api/v2");
    }
}
