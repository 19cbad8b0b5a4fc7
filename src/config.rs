use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` keeps users in memory.
    pub database: Option<DatabaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            database: None,
        }
    }
}

/// Parses an optional raw value, falling back to `default` only when unset.
fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {name} {v:?}: {e}")),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let host = std::env::var("APP_HOST").unwrap_or(defaults.host);
        let port = parse_var("APP_PORT", std::env::var("APP_PORT").ok(), defaults.port)?;
        let database = match std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_var(
                    "DATABASE_MAX_CONNECTIONS",
                    std::env::var("DATABASE_MAX_CONNECTIONS").ok(),
                    10,
                )?,
            }),
            None => None,
        };
        Ok(Self {
            host,
            port,
            database,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
