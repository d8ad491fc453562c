//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (SQLite)
    pub database_url: String,
    pub database_max_connections: u32,

    /// Access token lifetimes
    pub token_ttl_minutes: i64,
    pub guest_token_ttl_minutes: i64,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to defaults; present but unparseable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        };

        let config = Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://threadline.db".to_string()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,

            token_ttl_minutes: parse_or(&lookup, "TOKEN_TTL_MINUTES", 60 * 24 * 7)?,
            guest_token_ttl_minutes: parse_or(&lookup, "GUEST_TOKEN_TTL_MINUTES", 60 * 24)?,

            rust_log: lookup("RUST_LOG")
                .unwrap_or_else(|| "threadline=debug,tower_http=info".to_string()),
            log_format,
            port: parse_or(&lookup, "PORT", 3000)?,
        };

        if config.database_max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }
        if config.token_ttl_minutes <= 0 || config.guest_token_ttl_minutes <= 0 {
            anyhow::bail!("Token TTLs must be positive");
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", key, raw)),
        None => Ok(default),
    }
}
