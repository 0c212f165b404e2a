// src/config.rs

use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment or the .env file")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// | Env Var                   | Default     |
/// |---------------------------|-------------|
/// | `DATABASE_URL`            | (required)  |
/// | `HOST`                    | `0.0.0.0`   |
/// | `PORT`                    | `5000`      |
/// | `DB_MAX_CONNECTIONS`      | `10`        |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`         |
/// | `CORS_ORIGINS`            | any origin  |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// Empty means permissive CORS.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 5000u16)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10u32)?;
        let acquire_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5u64)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(acquire_secs),
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
