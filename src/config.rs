//! Runtime configuration, read once at startup and handed to constructors.

use std::net::SocketAddr;

use chrono::Duration;

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;
const DEFAULT_SESSION_TTL_SECS: u32 = 24 * 60 * 60;
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub bind_addr: SocketAddr,
    /// bcrypt work factor used when storing passwords.
    pub password_hash_cost: u32,
    /// How long a login token stays valid.
    pub session_ttl: Duration,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(Error::Config {
            field: "DATABASE_URL",
            reason: "must be set".into(),
        })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse_number("DATABASE_MAX_CONNECTIONS", &raw)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(Error::Config {
                field: "DATABASE_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|e| Error::Config {
            field: "BIND_ADDR",
            reason: format!("{bind_raw}: {e}"),
        })?;

        let password_hash_cost = match lookup("PASSWORD_HASH_COST") {
            Some(raw) => parse_number("PASSWORD_HASH_COST", &raw)?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&password_hash_cost) {
            return Err(Error::Config {
                field: "PASSWORD_HASH_COST",
                reason: format!("{password_hash_cost} is outside {MIN_HASH_COST}..={MAX_HASH_COST}"),
            });
        }

        let session_ttl_secs = match lookup("SESSION_TTL_SECS") {
            Some(raw) => parse_number("SESSION_TTL_SECS", &raw)?,
            None => DEFAULT_SESSION_TTL_SECS,
        };
        if session_ttl_secs == 0 {
            return Err(Error::Config {
                field: "SESSION_TTL_SECS",
                reason: "must be at least 1".into(),
            });
        }

        let mut logging = LoggingConfig::default();
        if let Some(level) = lookup("LOG_LEVEL") {
            logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(Error::Config {
                    field: "LOG_FORMAT",
                    reason: format!("{format} is not one of {}", LOG_FORMATS.join(", ")),
                });
            }
            logging.format = format;
        }

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
            },
            bind_addr,
            password_hash_cost,
            session_ttl: Duration::seconds(i64::from(session_ttl_secs)),
            logging,
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<u32> {
    raw.trim().parse().map_err(|e| Error::Config {
        field,
        reason: format!("{raw}: {e}"),
    })
}
