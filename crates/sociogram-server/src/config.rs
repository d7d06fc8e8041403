//! Server configuration loaded from environment variables.
//!
//! Platform credentials have no defaults: a missing value is a
//! [`ConfigError`] and the process exits before serving.

use std::net::SocketAddr;

use sociogram_remote::RemoteConfig;

use crate::error::ConfigError;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address for the HTTP server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Platform connection settings, all required.
    /// Env: `REMOTE_ENDPOINT`, `REMOTE_PROJECT_ID`, `REMOTE_API_KEY`,
    /// `REMOTE_DATABASE_ID`
    pub remote: RemoteConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary lookup. Keeps tests
    /// independent of the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_addr = match lookup("HTTP_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "HTTP_ADDR",
                value: raw.clone(),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let remote = RemoteConfig {
            endpoint: required(&lookup, "REMOTE_ENDPOINT")?,
            project_id: required(&lookup, "REMOTE_PROJECT_ID")?,
            api_key: required(&lookup, "REMOTE_API_KEY")?,
            database_id: required(&lookup, "REMOTE_DATABASE_ID")?,
        };

        Ok(Self { http_addr, remote })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}
