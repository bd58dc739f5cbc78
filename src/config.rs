//! Runtime configuration from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "https://localhost:3443"];

/// Longest accepted token lifetime: one year.
pub const MAX_JWT_EXPIRATION_MINUTES: i64 = 60 * 24 * 365;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// When unset the service runs on the in-memory store.
    pub database_url: Option<String>,
    /// Schema holding the `dishes` and `users` tables.
    pub db_schema: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let cors_origins = match get("CORS_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let jwt_expiration_minutes: i64 = parse_or("JWT_EXPIRATION_MINUTES", get("JWT_EXPIRATION_MINUTES"), "60")?;
        if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&jwt_expiration_minutes) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_MINUTES",
                value: jwt_expiration_minutes.to_string(),
            });
        }

        Ok(AppConfig {
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), "0.0.0.0:3000")?,
            database_url: get("DATABASE_URL"),
            db_schema: get("DISHES_SCHEMA").unwrap_or_else(|| "confusion".into()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), "5")?,
            jwt_secret,
            jwt_expiration_minutes,
            cors_origins,
            max_body_bytes: parse_or("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), "1048576")?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|_| ConfigError::Invalid { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.db_schema, "confusion");
        assert_eq!(cfg.jwt_expiration_minutes, 60);
        assert_eq!(cfg.cors_origins, vec!["http://localhost:3000", "https://localhost:3443"]);
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(config_from(&[]), Err(ConfigError::Missing("JWT_SECRET"))));
        assert!(matches!(config_from(&[("JWT_SECRET", "  ")]), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = config_from(&[("JWT_SECRET", "s"), ("DB_MAX_CONNECTIONS", "many")]).unwrap_err();
        match err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, "DB_MAX_CONNECTIONS");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn token_lifetime_must_be_in_range() {
        for bad in ["0", "-5", "9223372036854775807"] {
            let err = config_from(&[("JWT_SECRET", "s"), ("JWT_EXPIRATION_MINUTES", bad)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "JWT_EXPIRATION_MINUTES", .. }),
                "{bad} accepted"
            );
        }
        let cfg = config_from(&[("JWT_SECRET", "s"), ("JWT_EXPIRATION_MINUTES", "525600")]).unwrap();
        assert_eq!(cfg.jwt_expiration_minutes, MAX_JWT_EXPIRATION_MINUTES);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let cfg = config_from(&[("JWT_SECRET", "s"), ("CORS_ORIGINS", "https://a.example, https://b.example,")]).unwrap();
        assert_eq!(cfg.cors_origins, vec!["https://a.example", "https://b.example"]);
    }
}
