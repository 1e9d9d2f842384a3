//! Server configuration parsed from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "AnonForum";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub mongodb_uri: String,
    pub database: String,
    /// Upper bound on pooled store connections; driver default when `None`.
    pub max_pool_size: Option<u32>,
    /// Replace store error text in `Internal` statuses with an opaque message.
    pub redact_internal_errors: bool,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `HOST`: bind address, default `0.0.0.0`
    /// - `PORT`: default 5000
    /// - `MONGODB_URI`: default `mongodb://localhost:27017`
    /// - `MONGODB_DATABASE`: default `AnonForum`
    /// - `DB_MAX_CONNECTIONS`: positive integer, driver default when absent
    /// - `FORUM_REDACT_INTERNAL_ERRORS`: `true`/`false`, default `false`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for values that do not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reading through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for values that do not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_or("HOST", lookup("HOST"), DEFAULT_HOST)?;
        let port: u16 = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let mongodb_uri = lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());
        let database = lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let max_pool_size = lookup("DB_MAX_CONNECTIONS").map(parse_pool_size).transpose()?;
        let redact_internal_errors = parse_bool("FORUM_REDACT_INTERNAL_ERRORS", lookup("FORUM_REDACT_INTERNAL_ERRORS"))?;

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            mongodb_uri,
            database,
            max_pool_size,
            redact_internal_errors,
        })
    }
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { var, value }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| invalid(var, raw)),
    }
}

/// The driver reads a pool size of 0 as "unbounded", so only positive caps are accepted.
fn parse_pool_size(raw: String) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(invalid("DB_MAX_CONNECTIONS", raw)),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(var, raw)),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
