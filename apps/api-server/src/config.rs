//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use juicebox_infra::auth::{DEFAULT_ISSUER, DEFAULT_SECRET};
use juicebox_infra::{DatabaseConfig, HydrationConfig, JwtConfig};

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub hydration: HydrationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 20)?,
            min_connections: parse_or("DB_MIN_CONNECTIONS", 2)?,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 3000)?,
            database,
            jwt: jwt_from_env()?,
            hydration: HydrationConfig::new(parse_or("HYDRATION_CONCURRENCY", 8)?),
        })
    }
}

fn jwt_from_env() -> Result<JwtConfig, ConfigError> {
    let is_production = env::var("RUST_ENV")
        .map(|v| v == "production" || v == "prod")
        .unwrap_or(false);

    let secret = match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ if is_production => {
            tracing::error!("SECURITY: JWT_SECRET is not set in production");
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        _ => {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            DEFAULT_SECRET.to_string()
        }
    };

    Ok(JwtConfig {
        secret,
        expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 24)?,
        issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
    })
}

/// Parse an optional variable, falling back to `default` when it is unset.
fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        let port: u16 = parse_or("JUICEBOX_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Missing("DATABASE_URL").to_string(),
            "DATABASE_URL must be set"
        );
        assert_eq!(
            ConfigError::Invalid {
                name: "PORT",
                value: "abc".to_string()
            }
            .to_string(),
            "PORT has an invalid value: abc"
        );
    }
}
