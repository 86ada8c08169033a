//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::net::SocketAddr;

const DEFAULT_API_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CATALOG_BIND_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which document-store backend the catalog service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    Postgres,
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Optional here; binaries that talk to Postgres go through `require_database_url`.
    pub database_url: Option<String>,
    pub api_bind_addr: SocketAddr,
    pub catalog_bind_addr: SocketAddr,
    pub catalog_backend: CatalogBackend,
    pub max_connections: u32,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads `.env` (if present) and reads every setting from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, but with an injectable lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        let api_bind_addr = parse_addr(
            "API_BIND_ADDR",
            lookup("API_BIND_ADDR").as_deref().unwrap_or(DEFAULT_API_BIND_ADDR),
        )?;
        let catalog_bind_addr = parse_addr(
            "CATALOG_BIND_ADDR",
            lookup("CATALOG_BIND_ADDR")
                .as_deref()
                .unwrap_or(DEFAULT_CATALOG_BIND_ADDR),
        )?;

        let catalog_backend = match lookup("CATALOG_STORE")
            .map(|v| v.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("postgres") => CatalogBackend::Postgres,
            Some("memory") => CatalogBackend::Memory,
            Some(other) => anyhow::bail!(
                "CATALOG_STORE must be `postgres` or `memory` (got `{}`)",
                other
            ),
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be a valid u32 (got `{}`)", v))?
                .max(1),
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let log_format = match lookup("LOG_FORMAT").map(|v| v.trim().to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database_url,
            api_bind_addr,
            catalog_bind_addr,
            catalog_backend,
            max_connections,
            log_format,
        })
    }

    /// Database URL must be provided (no default) for safety.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set")
    }
}

fn parse_addr(key: &str, value: &str) -> anyhow::Result<SocketAddr> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a socket address like 0.0.0.0:3000 (got `{}`)", key, value))
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
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_bind_addr.port(), 3000);
        assert_eq!(config.catalog_bind_addr.port(), 4000);
        assert_eq!(config.catalog_backend, CatalogBackend::Postgres);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.require_database_url().is_err());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("API_BIND_ADDR", "127.0.0.1:8080"),
            ("CATALOG_STORE", "Memory"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.require_database_url().unwrap(), "postgres://localhost/shop");
        assert_eq!(config.api_bind_addr.port(), 8080);
        assert_eq!(config.catalog_backend, CatalogBackend::Memory);
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[("CATALOG_STORE", "mongo")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("API_BIND_ADDR", "nowhere")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "-3")])).is_err());
    }
}
