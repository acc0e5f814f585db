//! Server configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `BIND_ADDR` did not parse as a socket address.
    #[error("invalid BIND_ADDR '{value}': {source}")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
        /// Parser error.
        source: std::net::AddrParseError,
    },
    /// A numeric variable did not parse.
    #[error("invalid {name} '{value}'")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
    /// No `JWT_SECRET` outside development mode.
    #[error("JWT_SECRET must be set (or AUTH_ALLOW_INSECURE=1 for development)")]
    MissingJwtSecret,
}

/// Everything the server needs to start, resolved from environment
/// variables with development-friendly defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Redis connection string; `None` selects in-memory cache and a
    /// no-op event bus.
    pub redis_url: Option<String>,
    /// HMAC secret shared with the identity provider.
    pub jwt_secret: String,
    /// Group claim that grants admin rights.
    pub admin_group: String,
    /// TTL applied to cached query results.
    pub cache_ttl: Duration,
    /// Outbox poll interval.
    pub outbox_poll_interval: Duration,
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}

impl ServerConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_value = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_owned());
        let bind_addr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value,
                source,
            })?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                let allow_insecure =
                    env::var("AUTH_ALLOW_INSECURE").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_insecure {
                    tracing::warn!("JWT_SECRET unset, using an ephemeral secret (dev only)");
                    uuid::Uuid::new_v4().to_string()
                } else {
                    return Err(ConfigError::MissingJwtSecret);
                }
            }
        };

        Ok(Self {
            bind_addr,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            admin_group: env::var("ADMIN_GROUP").unwrap_or_else(|_| "admin".to_owned()),
            cache_ttl: parse_duration_ms("CACHE_TTL_MS", 300_000)?,
            outbox_poll_interval: parse_duration_ms("OUTBOX_POLL_INTERVAL_MS", 1_000)?,
        })
    }
}
