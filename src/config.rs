// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup; invalid values abort startup with a [`ConfigError`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `STORE_BACKEND` | Storage backend (`redb` or `memory`) | `redb` |
//! | `DATA_DIR` | Directory holding `notes.redb` | `./data` |
//! | `SESSION_COOKIE_SECURE` | Mark the session cookie `Secure` | `false` |
//! | `READY_DELAY_SECS` | Seconds before `/readyz` reports ready | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::storage::StoreBackend;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the storage backend selector.
pub const STORE_BACKEND_ENV: &str = "STORE_BACKEND";

/// Environment variable name for the data directory path.
///
/// Only used by the `redb` backend.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the session cookie `Secure` flag.
///
/// Enable whenever the service sits behind HTTPS.
pub const SESSION_COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";

/// Environment variable name for the readiness delay.
pub const READY_DELAY_SECS_ENV: &str = "READY_DELAY_SECS";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_READY_DELAY_SECS: u64 = 10;

/// Default `RUST_LOG` filter when the variable is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the redb database inside `DATA_DIR`.
pub const DATABASE_FILE_NAME: &str = "notes.redb";

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Storage selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Full path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redb,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub session_cookie_secure: bool,
    pub ready_delay: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host
            .parse()
            .map_err(|e| ConfigError::invalid(HOST_ENV, &host, e))?;

        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;

        let backend = parse_or(&lookup, STORE_BACKEND_ENV, StoreBackend::Redb)?;
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let session_cookie_secure = match lookup(SESSION_COOKIE_SECURE_ENV) {
            Some(value) => parse_bool(SESSION_COOKIE_SECURE_ENV, &value)?,
            None => false,
        };

        let ready_delay_secs = parse_or(&lookup, READY_DELAY_SECS_ENV, DEFAULT_READY_DELAY_SECS)?;
        let log_format = parse_or(&lookup, LOG_FORMAT_ENV, LogFormat::default())?;

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            storage: StorageConfig { backend, data_dir },
            session_cookie_secure,
            ready_delay: Duration::from_secs(ready_delay_secs),
            log_format,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::from([0, 0, 0, 0]), DEFAULT_PORT),
            storage: StorageConfig::default(),
            session_cookie_secure: false,
            ready_delay: Duration::from_secs(DEFAULT_READY_DELAY_SECS),
            log_format: LogFormat::default(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: ToString,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, &value, e)),
        _ => Ok(default),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid(var, value, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.storage.backend, StoreBackend::Redb);
        assert_eq!(config.storage.database_path(), PathBuf::from("./data/notes.redb"));
        assert_eq!(config.ready_delay, Duration::from_secs(10));
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("STORE_BACKEND", "memory"),
            ("DATA_DIR", "/var/lib/notes"),
            ("SESSION_COOKIE_SECURE", "true"),
            ("READY_DELAY_SECS", "0"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.storage.backend, StoreBackend::Memory);
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/notes"));
        assert!(config.session_cookie_secure);
        assert_eq!(config.ready_delay, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::Invalid { var: "STORE_BACKEND", .. })
        ));
        assert!(matches!(
            load(&[("HOST", "not an ip")]),
            Err(ConfigError::Invalid { var: "HOST", .. })
        ));
        assert!(matches!(
            load(&[("SESSION_COOKIE_SECURE", "maybe")]),
            Err(ConfigError::Invalid { var: "SESSION_COOKIE_SECURE", .. })
        ));
    }
}
